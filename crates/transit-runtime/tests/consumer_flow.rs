//! Inbound event decoding and dispatch.

mod common;

use common::*;
use std::sync::Arc;
use tokio::sync::watch;
use transit_runtime::consumer::{
    local_source, run_consumer, ChannelStatusEvent, CharacterStatusBody, CharacterStatusEvent,
    ConsumerRouter, InboundEnvelope,
};
use transit_runtime::testing::StaticPortals;
use transit_types::{ChannelId, TenantId, WorldId};

fn router(h: &Harness) -> Arc<ConsumerRouter> {
    Arc::new(ConsumerRouter::new(
        Arc::clone(&h.channels),
        Arc::clone(&h.orchestrator),
        topics(),
    ))
}

fn channel_event(tenant: TenantId, kind: &str, world: u16, channel: u8) -> InboundEnvelope {
    let event = ChannelStatusEvent {
        kind: kind.into(),
        world_id: world,
        channel_id: channel,
        ip_address: "10.0.0.1".into(),
        port: 7575,
    };
    InboundEnvelope {
        tenant,
        topic: TOPIC_CHANNELS.into(),
        payload: serde_json::to_vec(&event).unwrap(),
    }
}

fn logout_event(tenant: TenantId, character: u32, map: u32) -> InboundEnvelope {
    let event = CharacterStatusEvent {
        world_id: 0,
        character_id: character,
        kind: "LOGOUT".into(),
        body: CharacterStatusBody {
            channel_id: 1,
            map_id: map,
        },
    };
    InboundEnvelope {
        tenant,
        topic: TOPIC_CHARACTERS.into(),
        payload: serde_json::to_vec(&event).unwrap(),
    }
}

#[tokio::test]
async fn channel_lifecycle_maintains_the_registry() {
    let h = harness(StaticPortals::new());
    let tenant = TenantId::new();
    let router = router(&h);

    router
        .dispatch(channel_event(tenant, "STARTED", 0, 1))
        .await;
    router
        .dispatch(channel_event(tenant, "STARTED", 0, 2))
        .await;
    // Redelivery is idempotent.
    router
        .dispatch(channel_event(tenant, "STARTED", 0, 1))
        .await;
    assert_eq!(h.channels.snapshot(tenant).len(), 2);

    router
        .dispatch(channel_event(tenant, "SHUTDOWN", 0, 1))
        .await;
    assert_eq!(h.channels.snapshot(tenant).len(), 1);
    assert_eq!(
        h.channels.snapshot(tenant)[0],
        transit_types::ChannelEndpoint::new(WorldId(0), ChannelId(2))
    );
}

#[tokio::test]
async fn unknown_channel_status_kind_is_ignored() {
    let h = harness(StaticPortals::new());
    let tenant = TenantId::new();
    router(&h)
        .dispatch(channel_event(tenant, "REBALANCED", 0, 1))
        .await;
    assert!(h.channels.snapshot(tenant).is_empty());
}

#[tokio::test]
async fn logout_event_triggers_correction() {
    let portals = StaticPortals::new().with_spawn_point(START);
    let h = harness(portals);
    let tenant = TenantId::new();
    h.routes.install(tenant, vec![ferry()]);

    router(&h)
        .dispatch(logout_event(tenant, 42, EN_ROUTE_A.0))
        .await;

    let warps = payloads(&h.sink, TOPIC_WARPS);
    assert_eq!(warps.len(), 1);
    assert_eq!(warps[0]["characterId"], 42);
    assert_eq!(warps[0]["body"]["mapId"], START.0);
}

#[tokio::test]
async fn non_logout_character_status_is_filtered() {
    let portals = StaticPortals::new().with_spawn_point(START);
    let h = harness(portals);
    let tenant = TenantId::new();
    h.routes.install(tenant, vec![ferry()]);

    let event = CharacterStatusEvent {
        world_id: 0,
        character_id: 42,
        kind: "LOGIN".into(),
        body: CharacterStatusBody {
            channel_id: 1,
            map_id: EN_ROUTE_A.0,
        },
    };
    router(&h)
        .dispatch(InboundEnvelope {
            tenant,
            topic: TOPIC_CHARACTERS.into(),
            payload: serde_json::to_vec(&event).unwrap(),
        })
        .await;
    assert!(h.sink.batches().is_empty());
}

#[tokio::test]
async fn undecodable_payload_is_skipped() {
    let h = harness(StaticPortals::new());
    let tenant = TenantId::new();
    router(&h)
        .dispatch(InboundEnvelope {
            tenant,
            topic: TOPIC_CHANNELS.into(),
            payload: b"{not json".to_vec(),
        })
        .await;
    assert!(h.channels.snapshot(tenant).is_empty());
}

#[tokio::test]
async fn consumer_loop_drains_until_shutdown() {
    let h = harness(StaticPortals::new());
    let tenant = TenantId::new();
    let (feed, source) = local_source(16);
    let (stop_tx, stop_rx) = watch::channel(false);

    let consumer = tokio::spawn(run_consumer(source, router(&h), stop_rx));

    feed.send(channel_event(tenant, "STARTED", 0, 1))
        .await
        .unwrap();
    feed.send(channel_event(tenant, "STARTED", 0, 2))
        .await
        .unwrap();

    // Wait for both registrations to land, then signal shutdown.
    for _ in 0..50 {
        if h.channels.snapshot(tenant).len() == 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(h.channels.snapshot(tenant).len(), 2);

    stop_tx.send(true).unwrap();
    consumer.await.unwrap();
}

#[tokio::test]
async fn consumer_loop_ends_when_source_closes() {
    let h = harness(StaticPortals::new());
    let (feed, source) = local_source(4);
    let (_stop_tx, stop_rx) = watch::channel(false);

    let consumer = tokio::spawn(run_consumer(source, router(&h), stop_rx));
    drop(feed);
    consumer.await.unwrap();
}
