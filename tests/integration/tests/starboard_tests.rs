//! Starboard Integration Tests
//!
//! Run with: cargo test -p integration-tests --test starboard_tests

use integration_tests::{Call, TestBot, STAR, USER_A, USER_B, USER_C};
use starbot_core::Snowflake;
use starbot_service::{StarboardService, Transition};

async fn reflection_of(bot: &TestBot, source: Snowflake) -> Option<Snowflake> {
    bot.ctx.reflections().snapshot().await.get(source)
}

// ============================================================================
// Reflection lifecycle
// ============================================================================

#[tokio::test]
async fn test_crossing_threshold_creates_removes_and_recreates() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "look at this");

    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_C).await;

    let first = reflection_of(&bot, source).await.expect("reflected at 3");
    let posted = bot.client.posted(first).expect("reflection is live");
    assert_eq!(posted.channel_id, bot.starboard);
    let embed = posted.payload.embed.expect("reflection is an embed");
    assert_eq!(embed.footer.as_deref(), Some("⭐3  | #general"));
    assert!(embed
        .description
        .as_deref()
        .is_some_and(|d| d.ends_with("\nlook at this")));

    bot.client.set_reactions(source, STAR, 2);
    bot.unreact(bot.general, source, STAR, USER_C).await;

    assert_eq!(reflection_of(&bot, source).await, None);
    assert!(bot.client.posted(first).is_none());

    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_C).await;

    let second = reflection_of(&bot, source).await.expect("reflected again");
    assert_ne!(first, second);
    assert_eq!(bot.client.live_in(bot.starboard), vec![second]);
}

#[tokio::test]
async fn test_repeated_samples_edit_in_place() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "hello");

    bot.client.set_reactions(source, STAR, 4);
    bot.react(bot.general, source, STAR, USER_B).await;
    bot.react(bot.general, source, STAR, USER_C).await;

    let reflection = reflection_of(&bot, source).await.unwrap();
    assert_eq!(bot.client.sends_to(bot.starboard), 1);
    assert!(bot.client.calls().contains(&Call::Edit {
        channel_id: bot.starboard,
        message_id: reflection,
    }));
    assert_eq!(bot.ctx.reflections().snapshot().await.len(), 1);
}

#[tokio::test]
async fn test_only_the_latest_sample_counts() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "flicker");

    // Three adds were delivered, but by the time they are handled one is left
    bot.client.set_reactions(source, STAR, 1);
    for user in [USER_A, USER_B, USER_C] {
        bot.react(bot.general, source, STAR, user).await;
    }

    assert_eq!(reflection_of(&bot, source).await, None);
    assert_eq!(bot.client.sends_to(bot.starboard), 0);
}

#[tokio::test]
async fn test_repeated_removal_deletes_once() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "fading");
    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_B).await;
    let reflection = reflection_of(&bot, source).await.unwrap();

    bot.client.set_reactions(source, STAR, 2);
    bot.unreact(bot.general, source, STAR, USER_B).await;
    bot.unreact(bot.general, source, STAR, USER_B).await;

    let deletes: Vec<_> = bot
        .client
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Delete { .. }))
        .collect();
    assert_eq!(
        deletes,
        vec![Call::Delete {
            channel_id: bot.starboard,
            message_id: reflection,
        }]
    );
    assert_eq!(reflection_of(&bot, source).await, None);
}

#[tokio::test]
async fn test_reactions_cleared_removes_reflection() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "gone soon");
    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_B).await;
    assert!(reflection_of(&bot, source).await.is_some());

    bot.client.set_reactions(source, STAR, 0);
    bot.send(starbot_core::InboundEvent::ReactionsCleared {
        channel_id: bot.general,
        message_id: source,
    })
    .await;

    assert_eq!(reflection_of(&bot, source).await, None);
    assert!(bot.client.live_in(bot.starboard).is_empty());
}

#[tokio::test]
async fn test_reflection_deleted_by_hand_is_reposted() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "persistent");
    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_B).await;
    let first = reflection_of(&bot, source).await.unwrap();

    bot.client.delete_by_hand(first);
    bot.client.set_reactions(source, STAR, 4);
    bot.react(bot.general, source, STAR, USER_C).await;

    let second = reflection_of(&bot, source).await.unwrap();
    assert_ne!(first, second);
    assert!(bot.client.posted(second).is_some());
}

#[tokio::test]
async fn test_custom_emoji_and_threshold() {
    let bot = TestBot::with_settings(|s| {
        s.starboard.emoji = "🔥".to_string();
        s.starboard.threshold = 1;
    })
    .await;
    let source = bot.client.post_source(bot.general, USER_A, "hot take");

    bot.client.set_reactions(source, STAR, 5);
    bot.react(bot.general, source, STAR, USER_B).await;
    assert_eq!(reflection_of(&bot, source).await, None);

    bot.client.set_reactions(source, "🔥", 1);
    bot.react(bot.general, source, "🔥", USER_B).await;
    assert!(reflection_of(&bot, source).await.is_some());
}

// ============================================================================
// Skipped samples
// ============================================================================

#[tokio::test]
async fn test_missing_board_channel_changes_nothing() {
    let bot = TestBot::with_settings(|s| s.starboard.channel = "hall-of-fame".to_string()).await;
    let source = bot.client.post_source(bot.general, USER_A, "nowhere to go");
    bot.client.set_reactions(source, STAR, 5);

    let err = StarboardService::new(&bot.ctx)
        .sync(bot.general, source)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_CHANNEL");

    bot.react(bot.general, source, STAR, USER_B).await;
    assert!(bot.ctx.reflections().snapshot().await.is_empty());
    assert!(bot.client.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_threshold_changes_nothing() {
    let bot = TestBot::with_settings(|s| s.starboard.threshold = 0).await;
    let source = bot.client.post_source(bot.general, USER_A, "zero");
    bot.client.set_reactions(source, STAR, 5);

    let err = StarboardService::new(&bot.ctx)
        .sync(bot.general, source)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFIGURATION_MISSING");
    assert!(bot.client.calls().is_empty());
}

#[tokio::test]
async fn test_reactions_on_the_board_are_ignored() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.starboard, USER_A, "meta");
    bot.client.set_reactions(source, STAR, 10);

    let transition = StarboardService::new(&bot.ctx)
        .sync(bot.starboard, source)
        .await
        .unwrap();
    assert_eq!(transition, Transition::Noop);
    assert!(bot.ctx.reflections().snapshot().await.is_empty());
}

#[tokio::test]
async fn test_vanished_source_is_skipped() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "deleted");
    bot.client.delete_by_hand(source);

    bot.react(bot.general, source, STAR, USER_B).await;
    assert!(bot.client.calls().is_empty());
}

// ============================================================================
// delete_starred
// ============================================================================

#[tokio::test]
async fn test_delete_starred_prunes_the_map() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "regrettable");
    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_B).await;
    let reflection = reflection_of(&bot, source).await.unwrap();

    bot.say(USER_A, &format!("&delete_starred {reflection}")).await;

    assert!(bot.client.posted(reflection).is_none());
    assert!(bot.ctx.reflections().snapshot().await.is_empty());
    assert!(bot.replies().is_empty());
}

#[tokio::test]
async fn test_delete_starred_orphan_id() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "kept");
    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_B).await;
    let reflection = reflection_of(&bot, source).await.unwrap();

    let pruned = StarboardService::new(&bot.ctx)
        .delete_starred(Snowflake::new(424_242))
        .await
        .unwrap();

    assert_eq!(pruned, 0);
    assert_eq!(reflection_of(&bot, source).await, Some(reflection));
    assert!(bot.client.posted(reflection).is_some());
}

#[tokio::test]
async fn test_reflection_map_survives_restart() {
    let bot = TestBot::start().await;
    let source = bot.client.post_source(bot.general, USER_A, "durable");
    bot.client.set_reactions(source, STAR, 3);
    bot.react(bot.general, source, STAR, USER_B).await;
    let reflection = reflection_of(&bot, source).await.unwrap();

    let ctx = bot.restart().await;
    assert_eq!(ctx.reflections().snapshot().await.get(source), Some(reflection));

    // The restarted process edits the existing reflection instead of posting
    bot.client.clear_calls();
    bot.client.set_reactions(source, STAR, 4);
    StarboardService::new(&ctx).sync(bot.general, source).await.unwrap();
    assert_eq!(
        bot.client.calls(),
        vec![Call::Edit {
            channel_id: bot.starboard,
            message_id: reflection,
        }]
    );
}
