use std::path::PathBuf;

use clap::Parser;
use roomroute::prelude::*;
use serde::Serialize;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Route conference rooms to media servers and print one JSON line per room.
#[derive(Parser, Debug)]
#[command(name = "room-router", version)]
struct Args {
    /// Directory seed (servers, room capacities, open rooms).
    #[arg(long, default_value = "directory.json")]
    seed: PathBuf,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Record new rooms as open on their chosen server, so later
    /// arguments naming the same room stick to it.
    #[arg(long)]
    join: bool,

    /// Room ids, as they would arrive in a request parameter.
    #[arg(required = true)]
    rooms: Vec<String>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Line<'a> {
    room: &'a str,
    server: Option<ServerId>,
    #[serde(flatten)]
    reason: Option<PlacementReason>,
    url: Option<String>,
    params: Vec<(&'static str, String)>,
}

impl<'a> Line<'a> {
    fn placed(room: &'a str, d: &PlacementDecision) -> Self {
        Self {
            room,
            server: Some(d.server.id),
            reason: Some(d.reason),
            url: Some(d.server.endpoint_url()),
            params: d.server.route_params(),
        }
    }

    fn unplaced(room: &'a str) -> Self {
        Self {
            room,
            server: None,
            reason: None,
            url: None,
            params: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    roomroute::logging::init(env!("CARGO_PKG_NAME"), &args.log_level)?;

    let router = RoomRouter::from_seed(DirectorySeed::from_path(&args.seed)?)?;
    tracing::info!(seed = %args.seed.display(), "directory loaded");

    for raw in &args.rooms {
        let decision = match (args.join, raw.parse::<RoomId>()) {
            (true, Ok(room_id)) => router.join(room_id).await,
            _ => router.route_param(raw).await,
        };
        let line = match decision {
            Ok(d) => serde_json::to_string(&Line::placed(raw, &d))?,
            // No server is an answer, not a failure: print it and go on.
            Err(e) if e.is_no_server() => serde_json::to_string(&Line::unplaced(raw))?,
            Err(e) => return Err(e.into()),
        };
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> InMemoryRouter {
        let seed = DirectorySeed::from_json(include_str!("../directory.json")).unwrap();
        RoomRouter::from_seed(seed).unwrap()
    }

    #[tokio::test]
    async fn test_bundled_seed_routes_new_room_to_lighter_server() {
        let d = router().route_param("9").await.unwrap();
        assert_eq!(d.server.id, ServerId(2));
    }

    #[tokio::test]
    async fn test_placed_line_json() {
        let d = router().route_param("1").await.unwrap();
        let json = serde_json::to_value(Line::placed("1", &d)).unwrap();
        assert_eq!(json["room"], "1");
        assert_eq!(json["server"], 1);
        assert_eq!(json["reason"], "sticky");
        assert_eq!(json["url"], "https://media1.example.org:5443/openmeetings");
        assert_eq!(json["params"][1][0], "host");
    }

    #[test]
    fn test_unplaced_line_json() {
        let json = serde_json::to_value(Line::unplaced("x")).unwrap();
        assert!(json["server"].is_null());
        assert!(json["url"].is_null());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_args_require_rooms() {
        assert!(Args::try_parse_from(["room-router"]).is_err());
        let args = Args::try_parse_from(["room-router", "--join", "1", "abc"]).unwrap();
        assert!(args.join);
        assert_eq!(args.rooms, ["1", "abc"]);
    }
}
