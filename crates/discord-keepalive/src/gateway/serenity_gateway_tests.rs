//! SerenityGateway tests with real HTTP assertions.
//!
//! Uses wiremock to intercept Discord API calls via serenity's `HttpBuilder::proxy()`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::gateway::{GatewayError, GuildHandle, SerenityGateway, ThreadGateway};

    /// Route every Discord API call to a local wiremock server.
    fn proxy_gateway(proxy_url: &str) -> SerenityGateway {
        SerenityGateway::new(Arc::new(
            serenity::http::HttpBuilder::new("fake-token")
                .proxy(proxy_url)
                .ratelimiter_disabled(true)
                .build(),
        ))
    }

    fn discord_error(code: u32, message: &str) -> serde_json::Value {
        serde_json::json!({ "code": code, "message": message })
    }

    fn message_json(message_id: u64, channel_id: u64, content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": message_id.to_string(),
            "channel_id": channel_id.to_string(),
            "author": {
                "id": "1",
                "username": "keepalive",
                "global_name": null,
                "avatar": null,
                "bot": true
            },
            "content": content,
            "timestamp": "2024-01-01T00:00:00+00:00",
            "edited_timestamp": null,
            "tts": false,
            "mention_everyone": false,
            "mentions": [],
            "mention_roles": [],
            "attachments": [],
            "embeds": [],
            "pinned": false,
            "type": 0
        })
    }

    fn thread_json(
        thread_id: u64,
        guild_id: u64,
        parent_id: u64,
        name: &str,
    ) -> serde_json::Value {
        serde_json::json!({
            "id": thread_id.to_string(),
            "guild_id": guild_id.to_string(),
            "parent_id": parent_id.to_string(),
            "owner_id": "1",
            "name": name,
            "type": 11,
            "last_message_id": null,
            "position": 0,
            "permission_overwrites": [],
            "nsfw": false,
            "flags": 0,
            "message_count": 3,
            "member_count": 2,
            "rate_limit_per_user": 0,
            "thread_metadata": {
                "archived": false,
                "auto_archive_duration": 1440,
                "archive_timestamp": "2026-01-01T00:00:00+00:00",
                "locked": false,
                "invitable": true
            },
            "total_message_sent": 3
        })
    }

    fn guild_json(guild_id: u64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": guild_id.to_string(),
            "name": name,
            "icon": null,
            "icon_hash": null,
            "splash": null,
            "discovery_splash": null,
            "owner_id": "1",
            "widget_enabled": false,
            "widget_channel_id": null,
            "verification_level": 0,
            "default_message_notifications": 0,
            "explicit_content_filter": 0,
            "roles": [],
            "emojis": [],
            "features": [],
            "mfa_level": 0,
            "application_id": null,
            "system_channel_id": null,
            "system_channel_flags": 0,
            "rules_channel_id": null,
            "max_presences": null,
            "max_members": 250000,
            "vanity_url_code": null,
            "description": null,
            "banner": null,
            "premium_tier": 0,
            "premium_subscription_count": 0,
            "preferred_locale": "en-US",
            "public_updates_channel_id": null,
            "max_video_channel_users": 25,
            "nsfw_level": 0,
            "stickers": [],
            "premium_progress_bar_enabled": false,
            "safety_alerts_channel_id": null
        })
    }

    // ── send / delete ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_send_message_posts_content_and_returns_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v10/channels/100/messages"))
            .and(body_string_contains("ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_json(555, 100, "ping")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let message_id = gateway.send_message(100, "ping").await.unwrap();

        assert_eq!(message_id, 555);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_delete_message_hits_message_route() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v10/channels/100/messages/555"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        gateway.delete_message(100, 555).await.unwrap();
        server.verify().await;
    }

    #[tokio::test]
    async fn test_delete_unknown_message_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v10/channels/100/messages/555"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(discord_error(10008, "Unknown Message")),
            )
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let err = gateway.delete_message(100, 555).await.unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
    }

    // ── resolve ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_resolve_unknown_channel_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v10/channels/404404"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(discord_error(10003, "Unknown Channel")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let err = gateway.resolve_channel(404404).await.unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
        server.verify().await;
    }

    #[tokio::test]
    async fn test_resolve_forbidden_channel_is_other_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v10/channels/403403"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(discord_error(50001, "Missing Access")),
            )
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let err = gateway.resolve_channel(403403).await.unwrap_err();
        assert!(matches!(err, GatewayError::Discord(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_zero_id_is_rejected_without_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let err = gateway.resolve_channel(0).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidId(_)));
        server.verify().await;
    }

    // ── threads ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_list_active_threads_empty_guild() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v10/guilds/77/threads/active"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "threads": [],
                "members": [],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let guild = GuildHandle {
            id: 77,
            name: "test guild".to_string(),
        };
        assert!(gateway.list_active_threads(&guild).await.unwrap().is_empty());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_list_active_threads_returns_thread_ids() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v10/guilds/77/threads/active"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "threads": [
                    thread_json(501, 77, 40, "release-planning"),
                    thread_json(502, 77, 40, "bug-triage")
                ],
                "members": [],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let guild = GuildHandle {
            id: 77,
            name: "test guild".to_string(),
        };
        let mut ids = gateway.list_active_threads(&guild).await.unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![501, 502]);
        server.verify().await;
    }

    // ── guilds ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fetch_guild_returns_handle() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v10/guilds/77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(guild_json(77, "test guild")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let guild = gateway.fetch_guild(77).await.unwrap();

        assert_eq!(
            guild,
            GuildHandle {
                id: 77,
                name: "test guild".to_string(),
            }
        );
        server.verify().await;
    }

    #[tokio::test]
    async fn test_fetch_unknown_guild_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v10/guilds/78"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(discord_error(10004, "Unknown Guild")),
            )
            .mount(&server)
            .await;

        let gateway = proxy_gateway(&server.uri());
        let err = gateway.fetch_guild(78).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }
}
