//! The placement decision.

use roomroute_types::{Capacity, RoomId, Server};
use tracing::debug;

use crate::{PlacementDecision, PlacementError, ServerDirectory};

/// Decides which server should host `room_id`.
///
/// Walks the active servers in directory order. The first one already
/// hosting the room is returned at once, whatever the other servers'
/// loads. If none hosts it, the server with the strictly smallest
/// [`aggregate_capacity`](ServerDirectory::aggregate_capacity) wins;
/// on a tie the earlier server keeps the win.
///
/// Servers reporting `!is_active()` are skipped.
///
/// # Errors
/// [`PlacementError::NoServerAvailable`] if the directory has no active
/// server.
pub fn resolve<D>(room_id: RoomId, directory: &D) -> Result<PlacementDecision, PlacementError>
where
    D: ServerDirectory + ?Sized,
{
    let mut candidates = Vec::with_capacity(directory.active_servers().len());
    for server in active(directory) {
        let room_ids = directory.active_room_ids(server);
        if room_ids.contains(&room_id) {
            debug!(%room_id, server = %server.id, address = %server.address, "room already open on server");
            return Ok(PlacementDecision::sticky(server));
        }
        candidates.push((server, room_ids));
    }
    least_loaded(&candidates, directory)
}

/// Picks the least-loaded server for a room that is open nowhere.
///
/// Same rule and tie-break as the second half of [`resolve`].
pub fn resolve_unassigned<D>(directory: &D) -> Result<PlacementDecision, PlacementError>
where
    D: ServerDirectory + ?Sized,
{
    let candidates: Vec<_> = active(directory)
        .map(|s| (s, directory.active_room_ids(s)))
        .collect();
    least_loaded(&candidates, directory)
}

/// Places a room whose id arrives as text (a request parameter, an
/// invitation lookup result).
///
/// A malformed id can't match any open room, so it is placed like a new
/// room rather than rejected.
pub fn resolve_param<D>(raw: &str, directory: &D) -> Result<PlacementDecision, PlacementError>
where
    D: ServerDirectory + ?Sized,
{
    match raw.parse::<RoomId>() {
        Ok(room_id) => resolve(room_id, directory),
        Err(error) => {
            debug!(%error, "unparseable room id, placing as a new room");
            resolve_unassigned(directory)
        }
    }
}

fn active<D>(directory: &D) -> impl Iterator<Item = &Server>
where
    D: ServerDirectory + ?Sized,
{
    directory.active_servers().iter().filter(|s| s.is_active())
}

fn least_loaded<D>(
    candidates: &[(&Server, &[RoomId])],
    directory: &D,
) -> Result<PlacementDecision, PlacementError>
where
    D: ServerDirectory + ?Sized,
{
    let mut best: Option<(&Server, Capacity)> = None;
    for &(server, room_ids) in candidates {
        let capacity = directory.aggregate_capacity(server);
        debug!(
            server = %server.id,
            rooms = room_ids.len(),
            ?room_ids,
            %capacity,
            "checking server load"
        );
        // Strict `<`: an equal load never displaces an earlier server.
        if best.is_none_or(|(_, min)| capacity < min) {
            best = Some((server, capacity));
        }
    }
    best.map(|(server, capacity)| PlacementDecision::least_loaded(server, capacity))
        .ok_or(PlacementError::NoServerAvailable)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use roomroute_types::{Protocol, ServerId};

    use super::*;
    use crate::PlacementReason;

    /// A directory where every server's load is fixed up front.
    struct Fixed {
        servers: Vec<Server>,
        rooms: HashMap<ServerId, Vec<RoomId>>,
        loads: HashMap<ServerId, u64>,
    }

    impl Fixed {
        fn new(entries: Vec<(u64, Vec<u64>, u64)>) -> Self {
            let mut dir = Fixed {
                servers: Vec::new(),
                rooms: HashMap::new(),
                loads: HashMap::new(),
            };
            for (id, rooms, load) in entries {
                let sid = ServerId(id);
                dir.servers
                    .push(Server::new(sid, format!("h{id}"), Protocol::Https, 443));
                dir.rooms
                    .insert(sid, rooms.into_iter().map(RoomId).collect());
                dir.loads.insert(sid, load);
            }
            dir
        }
    }

    impl ServerDirectory for Fixed {
        fn active_servers(&self) -> &[Server] {
            &self.servers
        }

        fn active_room_ids(&self, server: &Server) -> &[RoomId] {
            &self.rooms[&server.id]
        }

        fn aggregate_capacity(&self, server: &Server) -> Capacity {
            Capacity(self.loads[&server.id])
        }
    }

    #[test]
    fn test_sticky_beats_lower_load() {
        let dir = Fixed::new(vec![(1, vec![1, 2], 10), (2, vec![3], 4)]);
        let d = resolve(RoomId(1), &dir).unwrap();
        assert_eq!(d.server.id, ServerId(1));
        assert_eq!(d.reason, PlacementReason::Sticky);
    }

    #[test]
    fn test_new_room_goes_to_least_loaded() {
        let dir = Fixed::new(vec![(1, vec![1, 2], 10), (2, vec![3], 4)]);
        let d = resolve(RoomId(9), &dir).unwrap();
        assert_eq!(d.server.id, ServerId(2));
        assert_eq!(
            d.reason,
            PlacementReason::LeastLoaded { capacity: Capacity(4) }
        );
    }

    #[test]
    fn test_tie_goes_to_first_listed() {
        let dir = Fixed::new(vec![(1, vec![1], 5), (2, vec![2], 5)]);
        assert_eq!(resolve(RoomId(99), &dir).unwrap().server.id, ServerId(1));
    }

    #[test]
    fn test_zero_load_server_is_a_valid_choice() {
        let dir = Fixed::new(vec![(1, vec![1], 3), (2, vec![], 0)]);
        let d = resolve(RoomId(7), &dir).unwrap();
        assert_eq!(d.server.id, ServerId(2));
        assert!(!d.is_sticky());
    }

    #[test]
    fn test_load_comes_from_directory_not_room_count() {
        // Server 1 hosts more rooms but reports the lighter load.
        let dir = Fixed::new(vec![(1, vec![1, 2, 3], 1), (2, vec![4], 50)]);
        let d = resolve(RoomId(9), &dir).unwrap();
        assert_eq!(d.server.id, ServerId(1));
        assert_eq!(d.reason, PlacementReason::LeastLoaded { capacity: Capacity(1) });
    }

    #[test]
    fn test_room_listed_twice_goes_to_first_server() {
        let dir = Fixed::new(vec![(1, vec![5, 1], 8), (2, vec![5], 1)]);
        assert_eq!(resolve(RoomId(5), &dir).unwrap().server.id, ServerId(1));
    }

    #[test]
    fn test_empty_directory_has_no_server() {
        let dir = Fixed::new(vec![]);
        assert_eq!(resolve(RoomId(1), &dir), Err(PlacementError::NoServerAvailable));
        assert_eq!(resolve_unassigned(&dir), Err(PlacementError::NoServerAvailable));
    }

    #[test]
    fn test_inactive_servers_are_skipped() {
        let mut dir = Fixed::new(vec![(1, vec![1], 0), (2, vec![2], 9)]);
        dir.servers[0].active = false;
        // Neither sticky nor least-loaded may pick the inactive server.
        assert_eq!(resolve(RoomId(1), &dir).unwrap().server.id, ServerId(2));
        dir.servers[1].active = false;
        assert_eq!(resolve(RoomId(1), &dir), Err(PlacementError::NoServerAvailable));
    }

    #[test]
    fn test_malformed_param_placed_as_new_room() {
        let dir = Fixed::new(vec![(1, vec![1], 10), (2, vec![2], 4)]);
        let d = resolve_param("not-a-room", &dir).unwrap();
        assert_eq!(d.server.id, ServerId(2));
        assert!(!d.is_sticky());
        assert!(resolve_param(" 1 ", &dir).unwrap().is_sticky());
    }

    #[test]
    fn test_decision_serializes_flat() {
        let dir = Fixed::new(vec![(1, vec![1], 10)]);
        let json = serde_json::to_value(resolve(RoomId(2), &dir).unwrap()).unwrap();
        assert_eq!(json["reason"], "least_loaded");
        assert_eq!(json["capacity"], 10);
        assert_eq!(json["server"]["id"], 1);

        let json = serde_json::to_value(resolve(RoomId(1), &dir).unwrap()).unwrap();
        assert_eq!(json["reason"], "sticky");
    }
}
