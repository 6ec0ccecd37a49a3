//! Integration tests for `RoomRouter` over in-memory and failing providers.

use roomroute::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

const SEED: &str = r#"{
    "servers": [
        { "id": 1, "name": "a", "address": "a.example.org", "protocol": "https",
          "port": 5443, "webapp": "openmeetings" },
        { "id": 2, "name": "b", "address": "b.example.org", "protocol": "https",
          "port": 5443, "webapp": "openmeetings" }
    ],
    "rooms": [
        { "id": 1, "capacity": 4 },
        { "id": 2, "capacity": 6 },
        { "id": 3, "capacity": 4 },
        { "id": 9, "capacity": 50 }
    ],
    "assignments": [
        { "room_id": 1, "server_id": 1 },
        { "room_id": 2, "server_id": 1 },
        { "room_id": 3, "server_id": 2 }
    ]
}"#;

fn router() -> InMemoryRouter {
    RoomRouter::from_seed(DirectorySeed::from_json(SEED).unwrap()).unwrap()
}

/// A registry whose backing service is down.
struct DownRegistry;

impl ServerRegistry for DownRegistry {
    async fn active_servers(&self) -> Result<Vec<Server>, DirectoryError> {
        Err(DirectoryError::Unavailable("registry unreachable".into()))
    }
}

/// Measures load by people present rather than by seats.
struct Occupancy {
    seats: Vec<(RoomId, u32)>,
    present: Vec<(RoomId, u64)>,
}

impl RoomCatalog for Occupancy {
    async fn room_capacities(
        &self,
        room_ids: &[RoomId],
    ) -> Result<Vec<(RoomId, u32)>, DirectoryError> {
        Ok(self.seats.iter().filter(|(id, _)| room_ids.contains(id)).copied().collect())
    }

    async fn aggregate_capacity(&self, room_ids: &[RoomId]) -> Result<Capacity, DirectoryError> {
        Ok(self
            .present
            .iter()
            .filter(|(id, _)| room_ids.contains(id))
            .map(|(_, n)| Capacity(*n))
            .sum())
    }
}

// =========================================================================
// Routing
// =========================================================================

#[tokio::test]
async fn test_route_sticky_and_least_loaded() {
    let router = router();

    let d = router.route(RoomId(3)).await.unwrap();
    assert_eq!(d.server.id, ServerId(2));
    assert!(d.is_sticky());

    let d = router.route(RoomId(9)).await.unwrap();
    assert_eq!(d.server.id, ServerId(2));
    assert_eq!(d.reason, PlacementReason::LeastLoaded { capacity: Capacity(4) });
    assert_eq!(
        d.server.endpoint_url(),
        "https://b.example.org:5443/openmeetings"
    );
}

#[tokio::test]
async fn test_route_compares_catalog_aggregate_not_seats() {
    let seed = DirectorySeed::from_json(SEED).unwrap();
    let registry = InMemoryRegistry::with_servers(seed.servers).unwrap();
    let sessions = InMemorySessions::with_assignments([
        (ServerId(1), RoomId(1)),
        (ServerId(2), RoomId(2)),
    ])
    .unwrap();
    // Server 1 has the bigger rooms but the fewer people.
    let catalog = Occupancy {
        seats: vec![(RoomId(1), 100), (RoomId(2), 1)],
        present: vec![(RoomId(1), 1), (RoomId(2), 50)],
    };
    let router = RoomRouter::new(registry, sessions, catalog);

    let d = router.route(RoomId(9)).await.unwrap();
    assert_eq!(d.server.id, ServerId(1));
    assert_eq!(d.reason, PlacementReason::LeastLoaded { capacity: Capacity(1) });
}

#[tokio::test]
async fn test_route_param_handles_malformed_ids() {
    let router = router();
    assert!(router.route_param("1").await.unwrap().is_sticky());

    let d = router.route_param("room-one").await.unwrap();
    assert_eq!(d.server.id, ServerId(2));
    assert!(!d.is_sticky());
}

#[tokio::test]
async fn test_route_unassigned_picks_least_loaded() {
    let d = router().route_unassigned().await.unwrap();
    assert_eq!(d.server.id, ServerId(2));
}

#[tokio::test]
async fn test_route_with_no_servers_is_no_server() {
    let router = RoomRouter::from_seed(DirectorySeed::default()).unwrap();
    let err = router.route(RoomId(1)).await.unwrap_err();
    assert!(err.is_no_server());
}

#[tokio::test]
async fn test_provider_failure_is_directory_error() {
    let router = RoomRouter::new(DownRegistry, InMemorySessions::new(), InMemoryCatalog::new());
    let err = router.route(RoomId(1)).await.unwrap_err();
    assert!(matches!(err, RoomrouteError::Directory(DirectoryError::Unavailable(_))));
    assert!(!err.is_no_server());
}

#[tokio::test]
async fn test_seed_errors_surface_from_from_seed() {
    let mut seed = DirectorySeed::from_json(SEED).unwrap();
    seed.servers.push(seed.servers[0].clone());
    assert!(matches!(
        RoomRouter::from_seed(seed),
        Err(RoomrouteError::Directory(DirectoryError::DuplicateServer(ServerId(1))))
    ));
}

// =========================================================================
// Live directory changes
// =========================================================================

#[tokio::test]
async fn test_deactivated_server_loses_its_sticky_rooms() {
    let router = router();
    router.registry().set_active(ServerId(2), false).await.unwrap();

    // Room 3 lived on server 2; with 2 inactive it is placed afresh.
    let d = router.route(RoomId(3)).await.unwrap();
    assert_eq!(d.server.id, ServerId(1));
    assert!(!d.is_sticky());
}

#[tokio::test]
async fn test_catalog_changes_shift_new_rooms() {
    let router = router();
    // Room 3 grows to 20 seats: server 2 is now the busier one.
    router.catalog().set_capacity(RoomId(3), 20).await;
    let d = router.route(RoomId(100)).await.unwrap();
    assert_eq!(d.server.id, ServerId(1));
    assert_eq!(d.reason, PlacementReason::LeastLoaded { capacity: Capacity(10) });
}

// =========================================================================
// Join / close
// =========================================================================

#[tokio::test]
async fn test_join_opens_new_room_on_chosen_server() {
    let router = router();

    let first = router.join(RoomId(9)).await.unwrap();
    assert_eq!(first.server.id, ServerId(2));
    assert!(!first.is_sticky());
    assert_eq!(router.sessions().server_of(RoomId(9)).await, Some(ServerId(2)));

    // Server 2 now carries 54 seats, but room 9 stays there.
    let again = router.join(RoomId(9)).await.unwrap();
    assert_eq!(again.server.id, ServerId(2));
    assert!(again.is_sticky());

    // The next new room goes to server 1 (10 < 54).
    assert_eq!(router.route(RoomId(10)).await.unwrap().server.id, ServerId(1));

    assert!(router.close(RoomId(9)).await);
    assert!(!router.close(RoomId(9)).await);
    assert_eq!(router.sessions().server_of(RoomId(9)).await, None);
}

#[tokio::test]
async fn test_join_reclaims_room_from_inactive_server() {
    let router = router();
    router.sessions().open_room(ServerId(1), RoomId(7)).await.unwrap();
    router.registry().set_active(ServerId(1), false).await.unwrap();

    let d = router.join(RoomId(7)).await.unwrap();
    assert_eq!(d.server.id, ServerId(2));
    assert_eq!(router.sessions().server_of(RoomId(7)).await, Some(ServerId(2)));

    // Recorded, so the next join sticks.
    assert!(router.join(RoomId(7)).await.unwrap().is_sticky());
    let old = router.registry().get(ServerId(1)).await.unwrap();
    let rooms = router.sessions().active_room_ids(&old).await.unwrap();
    assert!(!rooms.contains(&RoomId(7)));
}

#[tokio::test]
async fn test_join_reclaims_room_from_removed_server() {
    let router = router();
    router.registry().remove(ServerId(1)).await.unwrap();

    // Rooms 1 and 2 were recorded on server 1, which is gone.
    let d = router.join(RoomId(1)).await.unwrap();
    assert_eq!(d.server.id, ServerId(2));
    assert_eq!(router.sessions().server_of(RoomId(1)).await, Some(ServerId(2)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_for_new_room_converge() {
    let router = router();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let router = router.clone();
            tokio::spawn(async move { router.join(RoomId(500)).await.map(|d| d.server.id) })
        })
        .collect();

    let mut chosen = Vec::new();
    for handle in handles {
        chosen.push(handle.await.unwrap().unwrap());
    }

    let owner = router
        .sessions()
        .server_of(RoomId(500))
        .await
        .expect("room opened by some join");
    assert!(chosen.iter().all(|id| *id == owner), "{chosen:?} vs {owner}");
}
