//! Confirmation Prompt Integration Tests
//!
//! Run with: cargo test -p integration-tests --test prompt_tests

use std::time::Duration;

use integration_tests::{
    wait_until, Call, TestBot, BOT_USER, THUMBS_DOWN, THUMBS_UP, USER_A, USER_B,
};
use starbot_core::{InboundEvent, InboundMessage, ReactionEvent, Snowflake};
use starbot_service::{ChoiceMap, PromptOutcome, PromptService};
use tokio::task::JoinHandle;

/// Send a command without waiting for it, returning its task and prompt anchor
async fn start_command(bot: &TestBot, author: Snowflake, content: &str) -> (JoinHandle<()>, Snowflake) {
    let id = bot.client.post_source(bot.general, author, content);
    let handle = bot
        .dispatcher
        .dispatch(InboundEvent::MessageCreated(InboundMessage::new(
            id,
            bot.general,
            author,
            content,
        )))
        .await
        .expect("command task");

    let client = bot.client.clone();
    wait_until(|| {
        client
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::AddReaction { .. }))
            .count()
            == 2
    })
    .await;

    let anchor = *bot.client.live_in(bot.general).last().expect("prompt anchor");
    assert!(bot.ctx.prompts().is_pending(anchor));
    (handle, anchor)
}

fn removed_reactions(bot: &TestBot) -> Vec<(Snowflake, String)> {
    bot.client
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::RemoveReaction { emoji, user_id, .. } => Some((user_id, emoji)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Through the name lock command
// ============================================================================

#[tokio::test]
async fn test_only_the_target_user_can_answer() {
    let bot = TestBot::start().await;
    bot.say(USER_A, "&ilock cats").await;
    assert_eq!(bot.last_reply().as_deref(), Some("You have locked the name \"cats\"."));

    let (handle, anchor) = start_command(&bot, USER_A, "&ilock dogs").await;
    assert_eq!(
        bot.last_reply().as_deref(),
        Some("You have already locked the name \"cats\". Would you like to change your locked name?")
    );

    // The bot's own choice markers
    bot.react(bot.general, anchor, THUMBS_UP, BOT_USER).await;
    assert!(removed_reactions(&bot).is_empty());

    bot.react(bot.general, anchor, THUMBS_UP, USER_B).await;
    bot.react(bot.general, anchor, "🔥", USER_A).await;
    assert_eq!(
        removed_reactions(&bot),
        vec![(USER_B, THUMBS_UP.to_string()), (USER_A, "🔥".to_string())]
    );
    assert!(bot.ctx.prompts().is_pending(anchor));
    assert!(!handle.is_finished());

    bot.react(bot.general, anchor, THUMBS_UP, USER_A).await;
    handle.await.unwrap();

    assert!(bot.client.posted(anchor).is_none());
    assert_eq!(bot.ctx.prompts().pending(), 0);
    assert_eq!(bot.last_reply().as_deref(), Some("You have locked the name \"dogs\"."));
    assert_eq!(
        bot.ctx.images().snapshot().await.locked_name(USER_A),
        Some("dogs")
    );

    // Answered prompts stay answered
    let before = bot.client.calls().len();
    bot.react(bot.general, anchor, THUMBS_DOWN, USER_A).await;
    assert_eq!(bot.client.calls().len(), before);
}

#[tokio::test]
async fn test_answering_no_keeps_the_old_lock() {
    let bot = TestBot::start().await;
    bot.say(USER_A, "&ilock cats").await;

    let (handle, anchor) = start_command(&bot, USER_A, "&ilock dogs").await;
    bot.react(bot.general, anchor, THUMBS_DOWN, USER_A).await;
    handle.await.unwrap();

    assert_eq!(bot.last_reply().as_deref(), Some("Okay, you keep \"cats\"."));
    let images = bot.ctx.images().snapshot().await;
    assert_eq!(images.locked_name(USER_A), Some("cats"));
    assert_eq!(images.owner_of("dogs"), None);
}

#[tokio::test]
async fn test_prompt_anchor_is_not_starred() {
    let bot = TestBot::with_settings(|s| s.starboard.threshold = 1).await;
    bot.say(USER_A, "&ilock cats").await;

    let (handle, anchor) = start_command(&bot, USER_A, "&ilock dogs").await;
    bot.react(bot.general, anchor, "⭐", USER_B).await;
    assert!(bot.ctx.reflections().snapshot().await.is_empty());

    bot.react(bot.general, anchor, THUMBS_UP, USER_A).await;
    handle.await.unwrap();
    assert!(bot.client.live_in(bot.starboard).is_empty());
}

// ============================================================================
// Prompt service
// ============================================================================

#[tokio::test]
async fn test_first_qualifying_reaction_wins() {
    let bot = TestBot::start().await;
    let anchor = bot.client.post_source(bot.general, BOT_USER, "Pick a colour");
    let choices = ChoiceMap::new([("🔴", "red"), ("🔵", "blue"), ("🟢", "green")]).unwrap();

    let ctx = bot.ctx.clone();
    let general = bot.general;
    let ask = tokio::spawn(async move {
        PromptService::new(&ctx)
            .ask(USER_A, general, anchor, choices)
            .await
    });
    let ctx = bot.ctx.clone();
    wait_until(|| ctx.prompts().is_pending(anchor)).await;

    let service = PromptService::new(&bot.ctx);
    let first = service
        .on_reaction(&ReactionEvent::new(bot.general, anchor, "🔵", USER_A))
        .await
        .unwrap();
    let second = service
        .on_reaction(&ReactionEvent::new(bot.general, anchor, "🟢", USER_A))
        .await
        .unwrap();

    assert_eq!(first, PromptOutcome::Resolved("blue".to_string()));
    assert_eq!(second, PromptOutcome::NotAPrompt);
    assert_eq!(ask.await.unwrap().unwrap(), "blue");
}

#[tokio::test]
async fn test_abandoned_prompt_is_withdrawn() {
    let bot = TestBot::start().await;
    let anchor = bot.client.post_source(bot.general, BOT_USER, "Well?");

    let asked = tokio::time::timeout(
        Duration::from_millis(50),
        PromptService::new(&bot.ctx).ask(USER_A, bot.general, anchor, ChoiceMap::yes_no()),
    )
    .await;

    assert!(asked.is_err());
    assert_eq!(bot.ctx.prompts().pending(), 0);

    let outcome = PromptService::new(&bot.ctx)
        .on_reaction(&ReactionEvent::new(bot.general, anchor, THUMBS_UP, USER_A))
        .await
        .unwrap();
    assert_eq!(outcome, PromptOutcome::NotAPrompt);
}

#[test]
fn test_choice_map_rejects_duplicates() {
    assert!(ChoiceMap::new([("👍", "yes"), ("👍", "also yes")]).is_err());
    assert!(ChoiceMap::new(Vec::<(&str, &str)>::new()).is_err());
}
