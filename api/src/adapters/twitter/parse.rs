//! GraphQL payload walking
//!
//! Timeline responses are deeply nested and change shape between API
//! revisions, so they are walked as `serde_json::Value` instead of being
//! deserialized into fixed structs. Anything unrecognised is skipped.

use serde_json::Value;

use crate::domain::ports::{PlatformMedia, PlatformTweet, PlatformUser};

/// `rest_id` of the user in a `UserByScreenName` response
pub fn user_rest_id(payload: &Value) -> Option<String> {
    payload["data"]["user"]["result"]["rest_id"]
        .as_str()
        .map(str::to_string)
}

/// Tweets of a `UserTweets` response, in timeline order
pub fn user_timeline(payload: &Value) -> Vec<PlatformTweet> {
    let user = &payload["data"]["user"]["result"];
    let timeline = if user["timeline_v2"].is_object() {
        &user["timeline_v2"]["timeline"]
    } else {
        &user["timeline"]["timeline"]
    };
    tweets_from_instructions(&timeline["instructions"])
}

/// Tweets of a `ListLatestTweetsTimeline` response, in timeline order
pub fn list_timeline(payload: &Value) -> Vec<PlatformTweet> {
    let timeline = &payload["data"]["list"]["tweets_timeline"]["timeline"];
    tweets_from_instructions(&timeline["instructions"])
}

fn tweets_from_instructions(instructions: &Value) -> Vec<PlatformTweet> {
    let mut tweets = Vec::new();

    for instruction in instructions.as_array().into_iter().flatten() {
        if instruction["type"] != "TimelineAddEntries" {
            continue;
        }
        for entry in instruction["entries"].as_array().into_iter().flatten() {
            let entry_id = entry["entryId"].as_str().unwrap_or_default();
            let content = &entry["content"];

            if entry_id.starts_with("tweet-") {
                let result = &content["itemContent"]["tweet_results"]["result"];
                if let Some(tweet) = tweet_from_result(result) {
                    tweets.push(tweet);
                }
            } else if entry_id.contains("-conversation-") {
                for item in content["items"].as_array().into_iter().flatten() {
                    let result = &item["item"]["itemContent"]["tweet_results"]["result"];
                    if let Some(tweet) = tweet_from_result(result) {
                        tweets.push(tweet);
                    }
                }
            }
        }
    }

    tweets
}

fn tweet_from_result(result: &Value) -> Option<PlatformTweet> {
    let result = match result["__typename"].as_str() {
        Some("TweetWithVisibilityResults") => &result["tweet"],
        Some("TweetTombstone") | Some("TweetUnavailable") => return None,
        _ => result,
    };

    let legacy = &result["legacy"];
    let id = result["rest_id"]
        .as_str()
        .or_else(|| legacy["id_str"].as_str())?
        .to_string();

    // Long posts carry their full text in the note tweet
    let text = result["note_tweet"]["note_tweet_results"]["result"]["text"]
        .as_str()
        .or_else(|| legacy["full_text"].as_str())
        .map(str::to_string);

    Some(PlatformTweet {
        id,
        text,
        created_at: legacy["created_at"].as_str().map(str::to_string),
        user: user_from_result(&result["core"]["user_results"]["result"]),
        media: media_from_legacy(legacy),
        favorite_count: legacy["favorite_count"].as_u64(),
        retweet_count: legacy["retweet_count"].as_u64(),
        reply_count: legacy["reply_count"].as_u64(),
    })
}

fn user_from_result(user: &Value) -> Option<PlatformUser> {
    let field = |name: &str| {
        user["legacy"][name]
            .as_str()
            .or_else(|| user["core"][name].as_str())
            .map(str::to_string)
    };

    Some(PlatformUser {
        screen_name: field("screen_name")?,
        name: field("name"),
    })
}

fn media_from_legacy(legacy: &Value) -> Vec<PlatformMedia> {
    let media = if legacy["extended_entities"]["media"].is_array() {
        &legacy["extended_entities"]["media"]
    } else {
        &legacy["entities"]["media"]
    };

    media
        .as_array()
        .into_iter()
        .flatten()
        .map(|m| PlatformMedia {
            media_type: m["type"].as_str().map(str::to_string),
            url: m["media_url_https"]
                .as_str()
                .or_else(|| m["expanded_url"].as_str())
                .map(str::to_string),
        })
        .collect()
}
