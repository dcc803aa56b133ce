/// Command implementations
use clap::Subcommand;
use musicapp_client::{
    MusicAppClient, NewOnlineTrack, Page, SearchResult, Track, TrackQuery, UploadMetadata,
};
use musicapp_playback::PlayerKind;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "MUSICAPP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "MUSICAPP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Search the web catalogs
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List uploaded tracks
    Tracks {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// List web tracks saved to the library
    OnlineTracks {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Upload an audio file
    Upload {
        file: PathBuf,
        #[arg(short, long)]
        title: String,
        #[arg(long)]
        artist: Option<i64>,
        #[arg(long)]
        album: Option<i64>,
    },
    /// Save a web track to the library
    SaveOnline {
        title: String,
        stream_url: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        thumbnail: Option<String>,
    },
    /// List playlists
    Playlists,
    /// Create a playlist
    CreatePlaylist {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Add a track to a playlist
    AddToPlaylist { playlist: i64, track: i64 },
    /// List favorite tracks
    Favorites,
}

pub async fn run(client: &MusicAppClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            client.login(&username, &password).await?;
            println!("Logged in as {}", username);
        }
        Command::Register { username, password } => {
            let user = client.register(&username, &password).await?;
            println!("Account '{}' created. Run `musicapp login` to sign in.", user.username);
        }
        Command::Logout => {
            client.logout().await;
            println!("Logged out");
        }
        Command::Search { query } => {
            let results = client.search().search(&query.join(" ")).await?;
            print_search_results(&results);
        }
        Command::Tracks { search, page } => {
            let query = TrackQuery {
                search,
                page,
                page_size: None,
            };
            let tracks = client.library().list_tracks(&query).await?;
            print_tracks(&tracks);
        }
        Command::OnlineTracks { search, page } => {
            let query = TrackQuery {
                search,
                page,
                page_size: None,
            };
            let page = client.library().list_online_tracks(&query).await?;
            for track in &page.results {
                println!(
                    "{:>5}  {:<10} {}",
                    track.id,
                    track.source.as_deref().unwrap_or("-"),
                    track.title.as_deref().unwrap_or("Untitled")
                );
            }
            print_page_footer(&page);
        }
        Command::Upload {
            file,
            title,
            artist,
            album,
        } => {
            let metadata = UploadMetadata {
                title,
                artist,
                album,
            };
            let track = client.uploads().upload_track(&file, &metadata).await?;
            println!("Uploaded track {}: {}", track.id, track.display_title());
        }
        Command::SaveOnline {
            title,
            stream_url,
            source,
            thumbnail,
        } => {
            let result = SearchResult {
                title,
                artist: None,
                stream_url: Some(stream_url),
                thumbnail,
                source,
            };
            let saved = client
                .library()
                .add_online_track(&NewOnlineTrack::from(&result))
                .await?;
            println!("Saved online track {}", saved.id);
        }
        Command::Playlists => {
            for playlist in client.playlists().list().await? {
                println!("{:>5}  {}", playlist.id, playlist.name);
            }
        }
        Command::CreatePlaylist { name, description } => {
            let playlist = client
                .playlists()
                .create(&name, description.as_deref())
                .await?;
            println!("Created playlist {}: {}", playlist.id, playlist.name);
        }
        Command::AddToPlaylist { playlist, track } => {
            client.playlists().add_item(playlist, track).await?;
            println!("Added track {} to playlist {}", track, playlist);
        }
        Command::Favorites => {
            for favorite in client.playlists().favorites().await? {
                println!("{:>5}  track {}", favorite.id, favorite.track);
            }
        }
    }

    Ok(())
}

fn print_search_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results");
        return;
    }

    for (index, result) in results.iter().enumerate() {
        let kind = PlayerKind::for_source(&result.source);
        println!(
            "{:>3}. [{}] {} - {}",
            index + 1,
            result.source,
            result.title,
            result.artist.as_deref().unwrap_or("Unknown artist")
        );
        match result.media_source() {
            Some(media) => println!("     {} {}", kind, media.player_url()),
            None => println!("     {} (no playable URL)", kind),
        }
    }
}

fn print_tracks(page: &Page<Track>) {
    for track in &page.results {
        println!(
            "{:>5}  {:<40} {}",
            track.id,
            track.display_title(),
            track.duration.as_deref().unwrap_or("--:--")
        );
    }
    print_page_footer(page);
}

fn print_page_footer<T>(page: &Page<T>) {
    if page.has_next() {
        println!("({} of {} shown, use --page for more)", page.results.len(), page.count);
    }
}
