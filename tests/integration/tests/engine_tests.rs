//! Engine integration tests
//!
//! Drive the tally, award, and leaderboard use cases end-to-end over
//! scripted history pages and in-memory stores.

use std::collections::HashMap;
use std::sync::Arc;

use integration_tests::{context, page, InMemoryAwardStore, InMemoryTeamStore, ScriptedChatClient};
use tally_common::AwardConfig;
use tally_core::{
    AwardRecord, Boundary, ChannelMessage, DomainError, MessageId, Reaction,
};
use tally_engine::{
    render, AwardService, BoundaryResolver, DividerService, LeaderboardAggregator, RangeFetcher,
    TallyService,
};

const TEAM: &str = "T1";
const CHANNEL: &str = "C1";
const BOT: &str = "B1";

fn id(ts: &str) -> MessageId {
    MessageId::parse(ts).unwrap()
}

fn msg(ts: &str, author: &str, reactors: &[&str]) -> ChannelMessage {
    let reactions = if reactors.is_empty() {
        vec![]
    } else {
        vec![Reaction::new(
            "fire",
            reactors.iter().map(ToString::to_string).collect(),
        )]
    };
    ChannelMessage::new(id(ts), author, reactions)
}

fn setup() -> (
    Arc<ScriptedChatClient>,
    Arc<InMemoryTeamStore>,
    Arc<InMemoryAwardStore>,
) {
    let chat = Arc::new(ScriptedChatClient::new());
    let team_store = Arc::new(
        InMemoryTeamStore::new()
            .with_team(TEAM, BOT)
            .with_boundary(TEAM, id("1599393257.000100")),
    );
    let award_store = Arc::new(InMemoryAwardStore::new());
    (chat, team_store, award_store)
}

// ============================================================================
// Range fetching
// ============================================================================

#[tokio::test]
async fn test_fetch_pages_sequentially_and_strips_divider() {
    let (chat, team_store, award_store) = setup();

    let divider = id("1599393257.000100");
    chat.push_page(page(
        vec![msg("1599393257.000300", "U1", &["A"]), msg("1599393257.000100", BOT, &[])],
        Some("c1"),
    ));
    chat.push_page(page(
        vec![
            msg("1599393257.000500", "U2", &["A", "B"]),
            msg("1599393257.000400", "U3", &[]),
        ],
        Some("c2"),
    ));
    chat.push_page(page(vec![msg("1599393257.000600", "U4", &["C"])], None));

    let ctx = context(chat.clone(), team_store, award_store);
    let messages = RangeFetcher::new(&ctx)
        .fetch(&Boundary::Saved(divider), CHANNEL, BOT)
        .await
        .unwrap();

    // Divider stripped, pages appended in the order received
    let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "1599393257.000300",
            "1599393257.000500",
            "1599393257.000400",
            "1599393257.000600",
        ]
    );

    // Pages requested strictly in sequence, each with the previous cursor
    let cursors = chat.requested_cursors.lock().unwrap().clone();
    assert_eq!(
        cursors,
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
}

#[tokio::test]
async fn test_fetch_fails_when_divider_is_not_oldest_of_first_page() {
    let (chat, team_store, award_store) = setup();

    // The page does not end on the divider id: it was deleted
    chat.push_page(page(vec![msg("1599393257.000300", "U1", &["A"])], None));

    let ctx = context(chat, team_store, award_store);
    let result = RangeFetcher::new(&ctx)
        .fetch(&Boundary::Saved(id("1599393257.000100")), CHANNEL, BOT)
        .await;

    assert!(matches!(
        result,
        Err(DomainError::StartBoundaryNotFound(_))
    ));
}

#[tokio::test]
async fn test_fetch_fails_on_empty_first_page() {
    let (chat, team_store, award_store) = setup();
    chat.push_page(page(vec![], None));

    let ctx = context(chat, team_store, award_store);
    let result = RangeFetcher::new(&ctx)
        .fetch(&Boundary::Saved(id("1599393257.000100")), CHANNEL, BOT)
        .await;

    assert!(matches!(
        result,
        Err(DomainError::StartBoundaryNotFound(_))
    ));
}

#[tokio::test]
async fn test_fetch_discards_accumulation_on_page_failure() {
    let (chat, team_store, award_store) = setup();

    chat.push_page(page(
        vec![msg("1599393257.000300", "U1", &["A"]), msg("1599393257.000100", BOT, &[])],
        Some("c1"),
    ));
    chat.push_page_error("ratelimited");

    let ctx = context(chat, team_store, award_store);
    let result = RangeFetcher::new(&ctx)
        .fetch(&Boundary::Saved(id("1599393257.000100")), CHANNEL, BOT)
        .await;

    match result {
        Err(DomainError::ApiError(reason)) => assert_eq!(reason, "ratelimited"),
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_enforces_end_boundary_post_hoc() {
    let (chat, team_store, award_store) = setup();

    chat.push_page(page(
        vec![
            msg("1599393257.000900", "U4", &["D"]),
            msg("1599393257.000500", "U2", &["B"]),
            msg("1599393257.000300", "U1", &["A"]),
            msg("1599393257.000100", BOT, &[]),
        ],
        None,
    ));

    let boundary = Boundary::Explicit {
        start: id("1599393257.000100"),
        end: Some(id("1599393257.000500")),
    };

    let ctx = context(chat, team_store, award_store);
    let messages = RangeFetcher::new(&ctx)
        .fetch(&boundary, CHANNEL, BOT)
        .await
        .unwrap();

    // The message newer than the end marker is filtered out
    let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1599393257.000500", "1599393257.000300"]);
}

// ============================================================================
// Boundary resolution
// ============================================================================

#[tokio::test]
async fn test_resolve_empty_input_uses_saved_divider() {
    let (chat, team_store, award_store) = setup();
    let ctx = context(chat, team_store, award_store);

    let boundary = BoundaryResolver::new(&ctx).resolve(None, TEAM).await.unwrap();
    assert_eq!(boundary, Boundary::Saved(id("1599393257.000100")));

    let boundary = BoundaryResolver::new(&ctx)
        .resolve(Some("   "), TEAM)
        .await
        .unwrap();
    assert_eq!(boundary, Boundary::Saved(id("1599393257.000100")));
}

#[tokio::test]
async fn test_resolve_without_saved_divider_fails() {
    let chat = Arc::new(ScriptedChatClient::new());
    let team_store = Arc::new(InMemoryTeamStore::new().with_team(TEAM, BOT));
    let award_store = Arc::new(InMemoryAwardStore::new());
    let ctx = context(chat, team_store, award_store);

    let result = BoundaryResolver::new(&ctx).resolve(None, TEAM).await;
    assert!(matches!(result, Err(DomainError::NoSavedBoundary(_))));
}

#[tokio::test]
async fn test_resolve_explicit_pair_in_positional_order() {
    let (chat, team_store, award_store) = setup();
    let ctx = context(chat, team_store, award_store);

    let text = "https://x.slack.com/archives/C1/p1599393257001900 \
                https://x.slack.com/archives/C1/p1599393257000100 \
                https://x.slack.com/archives/C1/p1599393257009900";

    let boundary = BoundaryResolver::new(&ctx)
        .resolve(Some(text), TEAM)
        .await
        .unwrap();

    // First two references win, in text order; the third is ignored
    assert_eq!(
        boundary,
        Boundary::Explicit {
            start: id("1599393257.001900"),
            end: Some(id("1599393257.000100")),
        }
    );
}

#[tokio::test]
async fn test_resolve_rejects_text_without_references() {
    let (chat, team_store, award_store) = setup();
    let ctx = context(chat, team_store, award_store);

    let result = BoundaryResolver::new(&ctx)
        .resolve(Some("no links here"), TEAM)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::ExplicitBoundaryNotFound)
    ));
}

// ============================================================================
// Tally
// ============================================================================

#[tokio::test]
async fn test_tally_reports_top_ten_with_permalinks() {
    let (chat, team_store, award_store) = setup();

    // 12 reacted posts above the divider; engagement 12 down to 1
    let mut messages: Vec<ChannelMessage> = (0..12)
        .map(|i| {
            let reactors: Vec<String> = (0..(12 - i)).map(|r| format!("R{r}")).collect();
            let reactor_refs: Vec<&str> = reactors.iter().map(String::as_str).collect();
            msg(&format!("1599393257.{:06}", 200 + i), &format!("U{i}"), &reactor_refs)
        })
        .collect();
    messages.push(msg("1599393257.000100", BOT, &[]));
    chat.push_page(page(messages, None));

    let ctx = context(chat.clone(), team_store, award_store);
    let report = TallyService::new(&ctx)
        .tally(TEAM, CHANNEL, None)
        .await
        .unwrap();

    assert_eq!(report.candidates.len(), 10);
    assert_eq!(report.total_with_engagement, 12);
    assert!(report.has_surplus());
    assert!(report.candidates.iter().all(|c| c.permalink.is_some()));
    assert_eq!(report.candidates[0].engagement_count, 12);

    // Only the reported slice is enriched
    assert_eq!(chat.permalink_requests.lock().unwrap().len(), 10);

    let rendered = render::tally_report(&report);
    assert!(rendered.starts_with("📊 Top 10 posts since the divider:"));
}

#[tokio::test]
async fn test_tally_fails_when_permalink_fetch_fails() {
    let (chat, team_store, award_store) = setup();

    chat.push_page(page(
        vec![msg("1599393257.000300", "U1", &["A"]), msg("1599393257.000100", BOT, &[])],
        None,
    ));
    chat.fail_permalinks("missing_scope");

    let ctx = context(chat, team_store, award_store);
    let result = TallyService::new(&ctx).tally(TEAM, CHANNEL, None).await;

    assert!(matches!(result, Err(DomainError::ApiError(_))));
}

#[tokio::test]
async fn test_tally_excludes_bot_posts() {
    let (chat, team_store, award_store) = setup();

    chat.push_page(page(
        vec![
            msg("1599393257.000400", BOT, &["A", "B", "C"]),
            msg("1599393257.000300", "U1", &["A"]),
            msg("1599393257.000100", BOT, &[]),
        ],
        None,
    ));

    let ctx = context(chat, team_store, award_store);
    let report = TallyService::new(&ctx)
        .tally(TEAM, CHANNEL, None)
        .await
        .unwrap();

    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].author_id, "U1");
}

// ============================================================================
// Awards
// ============================================================================

#[tokio::test]
async fn test_award_explicit_text_saves_record() {
    let (chat, team_store, award_store) = setup();
    let ctx = context(chat, team_store, award_store.clone());
    let config = AwardConfig::default();

    let places = AwardService::new(&ctx, &config)
        .award(TEAM, CHANNEL, "U9", Some("<@A|a> <@B|b>,<@C|c>"))
        .await
        .unwrap();

    assert_eq!(places, vec![vec!["A"], vec!["B", "C"]]);

    let saved = award_store.saved_records();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].awarder_id, "U9");
    assert_eq!(saved[0].places, places);
}

#[tokio::test]
async fn test_award_derived_from_tally() {
    let (chat, team_store, award_store) = setup();

    // u1 and u2 tie at 2 reactions, u3 trails with 1
    chat.push_page(page(
        vec![
            msg("1599393257.000500", "u1", &["A", "B"]),
            msg("1599393257.000400", "u2", &["C", "D"]),
            msg("1599393257.000300", "u3", &["A"]),
            msg("1599393257.000100", BOT, &[]),
        ],
        None,
    ));

    let ctx = context(chat, team_store, award_store.clone());
    let config = AwardConfig::default();

    let places = AwardService::new(&ctx, &config)
        .award(TEAM, CHANNEL, "U9", None)
        .await
        .unwrap();

    assert_eq!(places, vec![vec!["u1", "u2"], vec!["u3"]]);
    assert_eq!(award_store.saved_records().len(), 1);
}

#[tokio::test]
async fn test_award_restriction_blocks_unlisted_awarder() {
    let (chat, team_store, award_store) = setup();
    let ctx = context(chat, team_store, award_store.clone());

    let config = AwardConfig {
        restrict_award_to: Some(HashMap::from([(
            TEAM.to_string(),
            vec!["U1".to_string()],
        )])),
    };

    let result = AwardService::new(&ctx, &config)
        .award(TEAM, CHANNEL, "U9", Some("<@A|a>"))
        .await;

    assert!(matches!(result, Err(DomainError::AwarderRestricted(_))));
    assert!(award_store.saved_records().is_empty());

    // A listed awarder passes
    let places = AwardService::new(&ctx, &config)
        .award(TEAM, CHANNEL, "U1", Some("<@A|a>"))
        .await
        .unwrap();
    assert_eq!(places, vec![vec!["A"]]);
}

// ============================================================================
// Leaderboard
// ============================================================================

fn record(places: &[&[&str]]) -> AwardRecord {
    AwardRecord::new(
        TEAM,
        "U9",
        places
            .iter()
            .map(|place| place.iter().map(ToString::to_string).collect())
            .collect(),
    )
}

#[tokio::test]
async fn test_leaderboard_folds_and_ranks() {
    let (chat, team_store, _) = setup();

    let award_store = Arc::new(
        InMemoryAwardStore::new()
            .with_record(record(&[&["a"], &["b"], &["c"]]))
            .with_record(record(&[&["b", "c"], &["a"]]))
            // Places beyond the third are ignored
            .with_record(record(&[&["a"], &["c"], &["b"], &["d"]])),
    );

    let ctx = context(chat, team_store, award_store.clone());
    let entries = LeaderboardAggregator::new(&ctx).aggregate(TEAM).await.unwrap();

    // a: 2 firsts, 1 second; b: 1 first, 1 second, 1 third; c: 1 first,
    // 1 second, 1 third; d only ever placed fourth and never appears.
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].user_id, "a");
    assert_eq!(entries[0].counts.firsts, 2);

    // b and c tie fully; first-seen order breaks the tie
    assert_eq!(entries[1].user_id, "b");
    assert_eq!(entries[2].user_id, "c");

    assert_eq!(award_store.cursors_closed(), award_store.cursors_opened());
}

#[tokio::test]
async fn test_leaderboard_is_stable_across_runs() {
    let (chat, team_store, _) = setup();

    let award_store = Arc::new(
        InMemoryAwardStore::new()
            .with_record(record(&[&["a"]]))
            .with_record(record(&[&["b"]]))
            .with_record(record(&[&["c"], &["a"]])),
    );

    let ctx = context(chat, team_store, award_store);
    let aggregator = LeaderboardAggregator::new(&ctx);

    let first = aggregator.aggregate(TEAM).await.unwrap();
    let second = aggregator.aggregate(TEAM).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_leaderboard_closes_cursor_on_scan_failure() {
    let (chat, team_store, _) = setup();

    let award_store = Arc::new(
        InMemoryAwardStore::new()
            .with_record(record(&[&["a"]]))
            .with_record(record(&[&["b"]])),
    );
    award_store.fail_after(1);

    let ctx = context(chat, team_store, award_store.clone());
    let result = LeaderboardAggregator::new(&ctx).aggregate(TEAM).await;

    assert!(matches!(result, Err(DomainError::StorageError(_))));
    assert_eq!(award_store.cursors_closed(), 1);
}

// ============================================================================
// Divider
// ============================================================================

#[tokio::test]
async fn test_divide_posts_marker_and_saves_boundary() {
    let (chat, team_store, award_store) = setup();
    chat.push_posted_id(id("1599400000.000200"));

    let ctx = context(chat.clone(), team_store.clone(), award_store);
    let posted = DividerService::new(&ctx).divide(TEAM, CHANNEL).await.unwrap();

    assert_eq!(posted, id("1599400000.000200"));

    let posts = chat.posted_messages.lock().unwrap().clone();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, CHANNEL);
    assert_eq!(posts[0].1, render::DIVIDER_MESSAGE);

    use tally_core::TeamStore;
    let saved = team_store.get_saved_boundary(TEAM).await.unwrap();
    assert_eq!(saved, Some(id("1599400000.000200")));
}
