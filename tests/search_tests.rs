//! Integration tests for the replay search pipeline.
//!
//! Runs the service against a temporary SQLite database seeded with a small
//! set of replays and accounts.

use chrono::{DateTime, TimeZone, Utc};
use replay_browser::config::SearchConfig;
use replay_browser::db::Store;
use replay_browser::domain::{ReplayId, SearchMode};
use replay_browser::models::{NewParticipant, NewReplay, Participant, Replay};
use replay_browser::services::{
    ReplayService, SeaOrmReplayService, SearchError, SearchRequest, SearchResult,
};
use uuid::Uuid;

const ALICE: &str = "6f1c3a52-9d4e-4b1a-8c3e-2f7a9b0d1e11";
const BOB: &str = "b0b0b0b0-1111-4222-8333-444455556666";
const CAROL: &str = "ca401ca4-7777-4888-9999-aaaabbbbcccc";
const ADMIN: &str = "ad3117ad-0000-4000-8000-000000000001";

struct Fixture {
    store: Store,
    service: SeaOrmReplayService,
    box_nukeops: ReplayId,
    saltern: ReplayId,
    box_fland: ReplayId,
}

fn guid(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap()
}

fn date(day: u32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap())
}

fn player(guid: &str, ic: &str, ooc: &str) -> NewParticipant {
    NewParticipant {
        player_guid: guid.to_string(),
        player_ic_name: ic.to_string(),
        player_ooc_name: ooc.to_string(),
        job: Some("Assistant".to_string()),
        antag: false,
    }
}

async fn open_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("replay-browser-search-test-{}.db", Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open test store")
}

async fn setup_with(settings: SearchConfig) -> Fixture {
    let store = open_store().await;

    store.add_account(guid(ALICE), "alice", false, true).await.unwrap();
    store.add_account(guid(CAROL), "carol", false, false).await.unwrap();
    store.add_account(guid(ADMIN), "admin", true, false).await.unwrap();

    let box_nukeops = store
        .add_replay(NewReplay {
            link: "https://replays.example/1.zip".to_string(),
            map: "Box Station".to_string(),
            gamemode: "Nukeops".to_string(),
            server_id: "wizards_den_lizard".to_string(),
            server_name: Some("Wizard's Den Lizard".to_string()),
            round_id: Some(12345),
            date: date(3),
            duration: "01:12:00".to_string(),
            round_end_text: Some("The nuclear operatives detonated the nuke".to_string()),
            players: vec![
                player(ALICE, "Alice Liddell", "alice"),
                player(BOB, "Robert Paulson", "bob"),
            ],
        })
        .await
        .unwrap();

    let saltern = store
        .add_replay(NewReplay {
            link: "https://replays.example/2.zip".to_string(),
            map: "Saltern".to_string(),
            gamemode: "Traitor".to_string(),
            server_id: "wizards_den_leviathan".to_string(),
            server_name: None,
            round_id: None,
            date: date(2),
            duration: "00:45:00".to_string(),
            round_end_text: Some("The crew escaped on the shuttle".to_string()),
            players: vec![
                player(CAROL, "Carol Danvers", "carol"),
                player(&ALICE.to_uppercase(), "Alice Liddell", "alice"),
            ],
        })
        .await
        .unwrap();

    let box_fland = store
        .add_replay(NewReplay {
            link: "https://replays.example/3.zip".to_string(),
            map: "Boxstation Fland".to_string(),
            gamemode: "Extended".to_string(),
            server_id: "lizard".to_string(),
            server_name: Some("Lizard".to_string()),
            round_id: Some(999),
            date: None,
            duration: "02:00:00".to_string(),
            round_end_text: None,
            players: vec![player(BOB, "Robert Paulson", "bob")],
        })
        .await
        .unwrap();

    let service = SeaOrmReplayService::new(store.clone(), settings);

    Fixture {
        store,
        service,
        box_nukeops,
        saltern,
        box_fland,
    }
}

async fn setup() -> Fixture {
    setup_with(SearchConfig::default()).await
}

fn request(mode: &str, query: &str) -> SearchRequest {
    SearchRequest {
        mode: mode.to_string(),
        query: query.to_string(),
        viewer: None,
        page: 0,
    }
}

fn ids(result: &SearchResult) -> Vec<ReplayId> {
    result.replays.iter().map(|r| r.id).collect()
}

/// Redacted players have an empty in-character name.
fn player_named<'a>(replay: &'a Replay, ic_name: &str) -> &'a Participant {
    replay
        .round_end_players
        .iter()
        .find(|p| p.player_ic_name == ic_name)
        .unwrap()
}

#[tokio::test]
async fn test_map_search_orders_missing_dates_last() {
    let fx = setup().await;

    let result = fx.service.search(request("map", "BOX")).await.unwrap();

    assert_eq!(ids(&result), vec![fx.box_nukeops, fx.box_fland]);
    assert_eq!(result.total_replays, 2);
    assert_eq!(result.page_count, 1);
    assert_eq!(result.search_mode, SearchMode::Map);
    assert!(!result.is_cache);
}

#[tokio::test]
async fn test_field_modes() {
    let fx = setup().await;

    let by_gamemode = fx.service.search(request("Gamemode", "traitor")).await.unwrap();
    assert_eq!(ids(&by_gamemode), vec![fx.saltern]);

    let by_server_id = fx.service.search(request("server id", "wizards")).await.unwrap();
    assert_eq!(ids(&by_server_id), vec![fx.box_nukeops, fx.saltern]);

    // replays without a server name never match
    let by_server_name = fx.service.search(request("ServerName", "den")).await.unwrap();
    assert_eq!(ids(&by_server_name), vec![fx.box_nukeops]);

    let by_round = fx.service.search(request("round_id", "234")).await.unwrap();
    assert_eq!(ids(&by_round), vec![fx.box_nukeops]);

    let by_round = fx.service.search(request("RoundId", "99")).await.unwrap();
    assert_eq!(ids(&by_round), vec![fx.box_fland]);
}

#[tokio::test]
async fn test_like_wildcards_are_literal() {
    let fx = setup().await;

    let result = fx.service.search(request("map", "%")).await.unwrap();
    assert_eq!(result.total_replays, 0);

    let result = fx.service.search(request("ServerId", "_")).await.unwrap();
    assert_eq!(ids(&result), vec![fx.box_nukeops, fx.saltern]);
}

#[tokio::test]
async fn test_participant_modes() {
    let fx = setup().await;

    let by_ic = fx.service.search(request("PlayerIcName", "paulson")).await.unwrap();
    assert_eq!(ids(&by_ic), vec![fx.box_nukeops, fx.box_fland]);

    let by_ooc = fx.service.search(request("player ooc name", "caro")).await.unwrap();
    assert_eq!(ids(&by_ooc), vec![fx.saltern]);

    // stored GUIDs are lowercased, so an upper case insert still matches
    let by_guid = fx.service.search(request("guid", "B0B0B0B0")).await.unwrap();
    assert_eq!(ids(&by_guid), vec![fx.box_nukeops, fx.box_fland]);
}

#[tokio::test]
async fn test_round_end_text_search() {
    let fx = setup().await;

    let result = fx.service.search(request("RoundEndText", "nuke")).await.unwrap();
    assert_eq!(ids(&result), vec![fx.box_nukeops]);

    let result = fx.service.search(request("round end text", "crew shuttle")).await.unwrap();
    assert_eq!(ids(&result), vec![fx.saltern]);

    let result = fx.service.search(request("6", "nuke\" OR (crew")).await.unwrap();
    assert_eq!(result.total_replays, 0);
}

#[tokio::test]
async fn test_text_index_follows_updates() {
    let fx = setup().await;

    let added = fx
        .store
        .add_replay(NewReplay {
            map: "Packed".to_string(),
            round_end_text: Some("A wizard stole the nuke disk".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let result = fx.service.search(request("RoundEndText", "wizard")).await.unwrap();
    assert_eq!(ids(&result), vec![added]);
}

#[tokio::test]
async fn test_ordinal_modes() {
    let fx = setup().await;

    let result = fx.service.search(request("0", "saltern")).await.unwrap();
    assert_eq!(result.search_mode, SearchMode::Map);
    assert_eq!(ids(&result), vec![fx.saltern]);

    let result = fx.service.search(request("8", "12345")).await.unwrap();
    assert_eq!(result.search_mode, SearchMode::RoundId);
}

#[tokio::test]
async fn test_validation_errors() {
    let fx = setup().await;

    let err = fx.service.search(request("weather", "box")).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidMode(ref e) if e.attempted == "weather"));

    // mode is validated before the query
    let err = fx.service.search(request("weather", "")).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidMode(_)));

    let err = fx.service.search(request("map", "")).await.unwrap_err();
    assert!(matches!(err, SearchError::EmptyQuery));

    let err = fx.service.search(request("map", "   ")).await.unwrap_err();
    assert!(matches!(err, SearchError::EmptyQuery));

    let mut negative = request("map", "box");
    negative.page = -1;
    let err = fx.service.search(negative).await.unwrap_err();
    assert!(matches!(err, SearchError::NegativePage(-1)));

    let system = fx.store.get_system_account().await.unwrap().unwrap();
    assert!(fx.store.get_history(system.id, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pagination_and_cap() {
    let fx = setup_with(SearchConfig {
        page_size: 2,
        search_limit: 3,
        ..SearchConfig::default()
    })
    .await;

    let mut expected = Vec::new();
    for day in 1..=5 {
        let id = fx
            .store
            .add_replay(NewReplay {
                map: "Meta".to_string(),
                date: date(10 + day),
                ..Default::default()
            })
            .await
            .unwrap();
        expected.push(id);
    }
    expected.reverse();

    let first = fx.service.search(request("map", "meta")).await.unwrap();
    assert_eq!(ids(&first), expected[..2].to_vec());
    assert_eq!(first.total_replays, 5);
    assert_eq!(first.page_count, 3);

    let mut second = request("map", "meta");
    second.page = 1;
    let second = fx.service.search(second).await.unwrap();
    assert_eq!(ids(&second), vec![expected[2]]);
    assert_eq!(second.total_replays, 5);
    assert!(second.is_cache);

    // past the capped rows: empty, same total, no error
    let mut beyond = request("map", "meta");
    beyond.page = 2;
    let beyond = fx.service.search(beyond).await.unwrap();
    assert!(beyond.replays.is_empty());
    assert_eq!(beyond.total_replays, 5);
    assert_eq!(beyond.current_page, 2);
}

#[tokio::test]
async fn test_repeated_search_hits_cache() {
    let fx = setup().await;

    let first = fx.service.search(request("map", "box")).await.unwrap();
    assert!(!first.is_cache);

    let second = fx.service.search(request("Map", "  Box ")).await.unwrap();
    assert!(second.is_cache);
    assert_eq!(ids(&second), ids(&first));

    // cached entries are a snapshot until they expire
    fx.store
        .add_replay(NewReplay {
            map: "Box Classic".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let third = fx.service.search(request("map", "box")).await.unwrap();
    assert!(third.is_cache);
    assert_eq!(third.total_replays, 2);

    let other_mode = fx.service.search(request("Gamemode", "box")).await.unwrap();
    assert!(!other_mode.is_cache);
}

#[tokio::test]
async fn test_private_players_are_redacted_per_viewer() {
    let fx = setup().await;

    let anonymous = fx.service.search(request("map", "box station")).await.unwrap();
    let replay = &anonymous.replays[0];
    let hidden = player_named(replay, "");
    assert_eq!(hidden.player_guid, Uuid::nil().to_string());
    assert!(hidden.player_ooc_name.is_empty());
    let bob = player_named(replay, "Robert Paulson");
    assert_eq!(bob.player_ooc_name, "bob");

    // served from cache, yet unredacted for the owner
    let mut as_alice = request("map", "box station");
    as_alice.viewer = Some(guid(ALICE));
    let owner_view = fx.service.search(as_alice).await.unwrap();
    assert!(owner_view.is_cache);
    assert_eq!(player_named(&owner_view.replays[0], "Alice Liddell").player_ooc_name, "alice");

    let mut as_admin = request("map", "box station");
    as_admin.viewer = Some(guid(ADMIN));
    let admin_view = fx.service.search(as_admin).await.unwrap();
    assert_eq!(player_named(&admin_view.replays[0], "Alice Liddell").player_guid, ALICE);

    let mut as_carol = request("map", "box station");
    as_carol.viewer = Some(guid(CAROL));
    let other_view = fx.service.search(as_carol).await.unwrap();
    assert!(player_named(&other_view.replays[0], "").player_ooc_name.is_empty());
}

#[tokio::test]
async fn test_identity_search_of_private_profile() {
    let fx = setup().await;

    let err = fx.service.search(request("guid", ALICE)).await.unwrap_err();
    assert!(matches!(err, SearchError::PrivateProfile));

    let err = fx.service.search(request("PlayerOocName", "ALIC")).await.unwrap_err();
    assert!(matches!(err, SearchError::PrivateProfile));

    let mut own = request("guid", &ALICE[..8]);
    own.viewer = Some(guid(ALICE));
    let result = fx.service.search(own).await.unwrap();
    assert_eq!(ids(&result), vec![fx.box_nukeops, fx.saltern]);

    // the guard runs even when the results are cached
    let err = fx.service.search(request("guid", &ALICE[..8])).await.unwrap_err();
    assert!(matches!(err, SearchError::PrivateProfile));

    let mut admin = request("player ooc name", "alice");
    admin.viewer = Some(guid(ADMIN));
    assert!(fx.service.search(admin).await.is_ok());

    let public = fx.service.search(request("PlayerOocName", "carol")).await.unwrap();
    assert_eq!(ids(&public), vec![fx.saltern]);

    // in-character names are not identity-keyed
    let by_ic = fx.service.search(request("PlayerIcName", "alice")).await.unwrap();
    assert_eq!(by_ic.total_replays, 2);
}

#[tokio::test]
async fn test_search_history() {
    let fx = setup().await;

    fx.service.search(request("map", "box")).await.unwrap();

    let system = fx.store.get_system_account().await.unwrap().unwrap();
    let entries = fx.store.get_history(system.id, 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "SearchPerformed");
    assert_eq!(entries[0].details.as_deref(), Some("Mode: Map, Query: box"));

    let mut as_carol = request("gamemode", "traitor");
    as_carol.viewer = Some(guid(CAROL));
    fx.service.search(as_carol).await.unwrap();

    let carol = fx.store.get_account(guid(CAROL)).await.unwrap().unwrap();
    let entries = fx.store.get_history(carol.id, 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].details.as_deref(), Some("Mode: Gamemode, Query: traitor"));

    // unknown viewers are recorded against the system account
    let mut stranger = request("map", "saltern");
    stranger.viewer = Some(Uuid::new_v4());
    fx.service.search(stranger).await.unwrap();
    assert_eq!(fx.store.get_history(system.id, 10).await.unwrap().len(), 2);

    // refused searches are still recorded
    let _ = fx.service.search(request("guid", ALICE)).await;
    assert_eq!(fx.store.get_history(system.id, 10).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_replay() {
    let fx = setup().await;

    let replay = fx.service.get_replay(fx.saltern, None).await.unwrap();
    assert_eq!(replay.map, "Saltern");
    assert_eq!(replay.round_end_players.len(), 2);
    assert_eq!(replay.round_end_players[0].player_ooc_name, "carol");
    assert!(replay.round_end_players[1].player_ooc_name.is_empty());

    let own = fx.service.get_replay(fx.saltern, Some(guid(ALICE))).await.unwrap();
    assert_eq!(own.round_end_players[1].player_guid, ALICE);

    let missing = fx.service.get_replay(ReplayId::new(9999), None).await.unwrap_err();
    assert!(matches!(missing, SearchError::NotFound(id) if id.value() == 9999));
}

#[tokio::test]
async fn test_most_recent_and_ids() {
    let fx = setup().await;

    let recent = fx.service.most_recent(None).await.unwrap();
    let recent_ids: Vec<_> = recent.iter().map(|r| r.id).collect();
    assert_eq!(recent_ids, vec![fx.box_fland, fx.saltern, fx.box_nukeops]);
    assert!(player_named(&recent[2], "").player_ooc_name.is_empty());

    let system = fx.store.get_system_account().await.unwrap().unwrap();
    let entries = fx.store.get_history(system.id, 10).await.unwrap();
    assert_eq!(entries[0].action, "MainPageViewed");

    let all = fx.service.list_replay_ids().await.unwrap();
    assert_eq!(all, vec![fx.box_nukeops, fx.saltern, fx.box_fland]);
}

#[tokio::test]
async fn test_most_recent_respects_limit() {
    let fx = setup_with(SearchConfig {
        most_recent_limit: 2,
        ..SearchConfig::default()
    })
    .await;

    let recent = fx.service.most_recent(None).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, fx.box_fland);
}

#[tokio::test]
async fn test_non_ascii_text_matches_case_insensitively() {
    let fx = setup().await;
    let emile = "e3113e00-2222-4333-8444-555566667777";
    fx.store.add_account(guid(emile), "Émile", false, true).await.unwrap();

    let ete = fx
        .store
        .add_replay(NewReplay {
            link: "https://replays.example/4.zip".to_string(),
            map: "Été Station".to_string(),
            gamemode: "Révolution".to_string(),
            server_id: "ÉCLAIR".to_string(),
            server_name: Some("Serveur Éclair".to_string()),
            players: vec![player(emile, "Émile Zola", "Émile")],
            ..Default::default()
        })
        .await
        .unwrap();

    for query in ["Été", "été", "ÉTÉ STATION"] {
        let result = fx.service.search(request("map", query)).await.unwrap();
        assert_eq!(ids(&result), vec![ete], "map query {query}");
    }

    let by_gamemode = fx.service.search(request("gamemode", "révo")).await.unwrap();
    assert_eq!(ids(&by_gamemode), vec![ete]);

    let by_server_id = fx.service.search(request("ServerId", "éclair")).await.unwrap();
    assert_eq!(ids(&by_server_id), vec![ete]);

    let by_server_name = fx.service.search(request("server name", "ÉCLAIR")).await.unwrap();
    assert_eq!(ids(&by_server_name), vec![ete]);

    for query in ["Émile", "émile zola"] {
        let result = fx.service.search(request("PlayerIcName", query)).await.unwrap();
        assert_eq!(ids(&result), vec![ete], "ic name query {query}");
    }

    // the private-profile guard folds usernames the same way
    let err = fx.service.search(request("PlayerOocName", "émile")).await.unwrap_err();
    assert!(matches!(err, SearchError::PrivateProfile));

    let mut own = request("PlayerOocName", "ÉMILE");
    own.viewer = Some(guid(emile));
    let result = fx.service.search(own).await.unwrap();
    assert_eq!(ids(&result), vec![ete]);
}

#[tokio::test]
async fn test_search_survives_history_failure() {
    use sea_orm::ConnectionTrait;

    let fx = setup().await;
    fx.store
        .conn
        .execute_unprepared("DROP TABLE history_entries")
        .await
        .unwrap();

    let result = fx.service.search(request("map", "box")).await.unwrap();
    assert_eq!(ids(&result), vec![fx.box_nukeops, fx.box_fland]);

    let mut as_carol = request("gamemode", "traitor");
    as_carol.viewer = Some(guid(CAROL));
    let result = fx.service.search(as_carol).await.unwrap();
    assert_eq!(ids(&result), vec![fx.saltern]);

    assert_eq!(fx.service.most_recent(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_without_system_account() {
    use sea_orm::ConnectionTrait;

    let fx = setup().await;
    fx.store
        .conn
        .execute_unprepared(
            "DELETE FROM accounts WHERE guid = '00000000-0000-0000-0000-000000000000'",
        )
        .await
        .unwrap();
    assert!(fx.store.get_system_account().await.unwrap().is_none());

    let result = fx.service.search(request("map", "saltern")).await.unwrap();
    assert_eq!(ids(&result), vec![fx.saltern]);
}
