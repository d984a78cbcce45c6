//! Quickdraw: a runnable tour of the engine.
//!
//! Implements "twenty-one" — players alternately add 1 to 3 to a
//! running total, and whoever reaches 21 wins — then plays a scripted
//! game through the orchestrator and pairs two more players through
//! the matchmaker.
//!
//! Run with `RUST_LOG=info cargo run -p quickdraw` to watch the
//! engine's structured logs alongside the demo output.

use std::sync::Arc;

use serde_json::json;
use turnhall::prelude::*;

const TARGET: i64 = 21;

/// Rules for twenty-one. The state is `{ "total": n, "last": id }`.
struct TwentyOne;

impl RulesContract for TwentyOne {
    fn game_type(&self) -> GameType {
        GameType::from("twenty-one")
    }

    fn initialize(&self, _player_count: usize) -> Result<serde_json::Value, RulesError> {
        Ok(json!({ "total": 0, "last": null }))
    }

    fn validate(&self, _state: &serde_json::Value, mv: &PlayerMove) -> Result<bool, RulesError> {
        Ok(mv
            .data
            .get("add")
            .and_then(serde_json::Value::as_i64)
            .is_some_and(|n| (1..=3).contains(&n)))
    }

    fn apply(
        &self,
        state: &serde_json::Value,
        mv: &PlayerMove,
    ) -> Result<serde_json::Value, RulesError> {
        let total = state["total"]
            .as_i64()
            .ok_or_else(|| RulesError::MalformedState("total".into()))?;
        let add = mv.data["add"]
            .as_i64()
            .ok_or_else(|| RulesError::MalformedMove("add".into()))?;
        Ok(json!({ "total": (total + add).min(TARGET), "last": mv.player_id }))
    }

    fn is_complete(&self, state: &serde_json::Value) -> Result<bool, RulesError> {
        Ok(state["total"].as_i64().unwrap_or(0) >= TARGET)
    }

    fn results(
        &self,
        state: &serde_json::Value,
        players: &[PlayerId],
    ) -> Result<Vec<PlayerResult>, RulesError> {
        let winner: PlayerId = serde_json::from_value(state["last"].clone())
            .map_err(|_| RulesError::MalformedState("last".into()))?;
        Ok(players
            .iter()
            .map(|&player_id| PlayerResult {
                player_id,
                outcome: if player_id == winner {
                    Outcome::Win
                } else {
                    Outcome::Loss
                },
                rating_delta: if player_id == winner { 20 } else { -20 },
            })
            .collect())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let engine = Engine::builder()
        .contract(Arc::new(TwentyOne))
        .snapshot_dir(std::env::temp_dir().join("quickdraw-snapshots"))
        .build()
        .await?;

    // Two players, one room, a full scripted game.
    let (alice, bob) = (PlayerId::new(), PlayerId::new());
    engine.directory().connect(alice, "alice");
    engine.directory().connect(bob, "bob");

    let room = engine.orchestrator().create_room(
        "Twenty-One Table",
        GameType::from("twenty-one"),
        2,
        false,
        None,
    )?;
    println!("room {} created ({})", room.room_id, room.name);

    engine.orchestrator().join(room.room_id, alice, None).await?;
    engine.orchestrator().join(room.room_id, bob, None).await?;
    println!("both seated, game on");

    loop {
        let overview = engine
            .orchestrator()
            .room(room.room_id)
            .await
            .ok_or("room vanished mid-game")?;
        let Some(mover) = overview.current_turn else {
            break; // terminal
        };
        let events = engine
            .orchestrator()
            .process_move(PlayerMove {
                room_id: room.room_id,
                player_id: mover,
                data: json!({ "add": 3 }),
            })
            .await?;
        for event in &events {
            if let RoomEvent::GameEnded { results } = event {
                for r in results {
                    println!(
                        "  {} -> {:?} ({:+})",
                        name_of(&engine, r.player_id),
                        r.outcome,
                        r.rating_delta
                    );
                }
            }
        }
    }
    println!(
        "ratings now: alice {}, bob {}",
        engine.directory().rating(alice).unwrap_or_default(),
        engine.directory().rating(bob).unwrap_or_default(),
    );

    // Two more players paired by the matchmaker.
    let (carol, dave) = (PlayerId::new(), PlayerId::new());
    engine.directory().connect(carol, "carol");
    engine.directory().connect(dave, "dave");
    engine
        .matchmaker()
        .enqueue(carol, GameType::from("twenty-one"), None)?;
    engine
        .matchmaker()
        .enqueue(dave, GameType::from("twenty-one"), None)?;
    engine.matchmaker().run_tick().await;
    if let Some(matched) = engine.orchestrator().rooms_with_player(carol).await.first() {
        println!(
            "matchmaker paired carol and dave into {} ({:?})",
            matched.room_id, matched.state
        );
    }

    engine.shutdown().await;
    Ok(())
}

fn name_of(engine: &Engine, player_id: PlayerId) -> String {
    engine
        .directory()
        .get(player_id)
        .map(|p| p.name)
        .unwrap_or_else(|| player_id.to_string())
}
