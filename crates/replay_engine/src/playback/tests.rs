    use super::*;
    use crate::replay::{Cell, Phase, Replay, Turn};
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct RecordingObserver {
        applied: BTreeMap<Slot, usize>,
        completed_turns: Vec<usize>,
        finished: Option<String>,
    }

    impl PlaybackObserver for RecordingObserver {
        fn bucket_applied(&mut self, slot: Slot, _event_count: usize) {
            *self.applied.entry(slot).or_insert(0) += 1;
        }

        fn turn_completed(&mut self, turn: &Turn) {
            self.completed_turns.push(turn.turn_number);
        }

        fn finished(&mut self, reason: &str) {
            self.finished = Some(reason.to_string());
        }
    }

    fn event(
        event_type: &str,
        entity: &str,
        id: Option<&str>,
        player: Option<usize>,
        location: Option<[usize; 2]>,
        destination: Option<[usize; 2]>,
    ) -> serde_json::Value {
        json!({
            "event_type": event_type,
            "entity": entity,
            "entity_id": id,
            "player": player,
            "location": location,
            "destination": destination,
        })
    }

    fn replay_from_turns(turn_events: Vec<serde_json::Value>) -> Replay {
        let turns: Vec<serde_json::Value> = turn_events
            .into_iter()
            .enumerate()
            .map(|(turn, events)| {
                json!({
                    "turn": turn,
                    "ants": [1, 1],
                    "hive": [0, 0],
                    "scores": [1, 1],
                    "events": events,
                })
            })
            .collect();
        let raw = json!({
            "players": 2,
            "map": { "width": 4, "height": 4, "contents": "0...\n....\n....\n...1" },
            "turns": turns,
            "finished_reason": "Turn limit reached",
        });
        Replay::from_json_str(&raw.to_string()).expect("replay")
    }

    /// Spawn in turn 0, move, attack and eat food in turn 1, die in turn 2.
    fn scenario() -> Replay {
        replay_from_turns(vec![
            json!([
                event("Spawn", "Ant", Some("a1"), Some(0), Some([1, 1]), None),
                event("Spawn", "Food", None, None, Some([2, 2]), None),
            ]),
            json!([
                event("Move", "Ant", Some("a1"), None, Some([1, 1]), Some([1, 2])),
                event("Attack", "Ant", Some("a1"), None, Some([1, 2]), Some([2, 2])),
                event("Remove", "Food", None, None, Some([2, 2]), None),
            ]),
            json!([event("Remove", "Ant", Some("a1"), None, None, None)]),
            json!([]),
        ])
    }

    fn tick_to(playback: &mut Playback, t: f64) -> PlaybackStatus {
        let dt = t - playback.clock().elapsed();
        playback.tick(dt).expect("tick")
    }

    fn all_slots(turns: usize) -> Vec<Slot> {
        (0..turns)
            .flat_map(|turn| Phase::ALL.into_iter().map(move |phase| Slot::new(turn, phase)))
            .collect()
    }

    #[test]
    fn single_turn_spawn_grows_during_spawn_phase() {
        let replay = replay_from_turns(vec![json!([event(
            "Spawn",
            "Ant",
            Some("a1"),
            Some(0),
            Some([2, 3]),
            None
        )])]);
        let mut playback = Playback::new(replay, 1.0);

        let status = playback.tick(0.0).expect("tick");
        assert_eq!(
            status,
            PlaybackStatus::Playing {
                turn: 0,
                phase: Phase::Spawn,
                progress: 0.0,
            }
        );
        let ant = playback.registry().ant("a1").expect("ant");
        assert_eq!(ant.size, 0.0);
        assert_eq!(ant.location, GridPoint::new(2.0, 3.0));
        assert!(ant.alive);

        let status = playback.tick(0.25).expect("tick");
        assert_eq!(
            status,
            PlaybackStatus::Playing {
                turn: 0,
                phase: Phase::Move,
                progress: 0.0,
            }
        );
        assert_eq!(playback.registry().ant("a1").expect("ant").size, ANT_SIZE);
    }

    #[test]
    fn starting_food_grows_in_like_spawned_food() {
        let raw = json!({
            "players": 1,
            "map": { "width": 3, "height": 1, "contents": "m 0.* \n" },
            "turns": [{ "turn": 0, "ants": [0], "hive": [0], "scores": [0], "events": [] }],
            "finished_reason": null,
        });
        let replay = Replay::from_json_str(&raw.to_string()).expect("replay");
        let mut playback = Playback::new(replay, 1.0);

        playback.tick(0.0).expect("tick");
        let food = playback.registry().food_at(Cell::new(0, 2)).expect("food");
        assert_eq!(food.size, 0.0);
        assert!(food.alive);

        tick_to(&mut playback, 0.25);
        let food = playback.registry().food_at(Cell::new(0, 2)).expect("food");
        assert_eq!(food.size, FOOD_SIZE);
    }

    #[test]
    fn final_turn_plays_then_finishes_frozen() {
        let mut playback = Playback::new(scenario(), 1.0);
        let mut observer = RecordingObserver::default();

        let status = playback.tick_with(3.5, &mut observer).expect("tick");
        assert!(matches!(status, PlaybackStatus::Playing { turn: 3, .. }));

        let status = playback.tick_with(10.0, &mut observer).expect("tick");
        assert_eq!(
            status,
            PlaybackStatus::Finished {
                reason: "Turn limit reached".to_string(),
            }
        );
        assert_eq!(observer.completed_turns, vec![0, 1, 2, 3]);
        assert_eq!(observer.finished.as_deref(), Some("Turn limit reached"));
        assert!(playback.is_finished());

        let entity_count = playback.registry().len();
        let status = playback.tick_with(1.0, &mut observer).expect("tick");
        assert!(matches!(status, PlaybackStatus::Finished { .. }));
        assert_eq!(playback.registry().len(), entity_count);
        assert_eq!(observer.completed_turns.len(), 4);
    }

    #[test]
    fn move_snaps_exactly_at_phase_end() {
        let mut playback = Playback::new(scenario(), 1.0);

        tick_to(&mut playback, 1.25);
        assert_eq!(
            playback.registry().ant("a1").expect("ant").location,
            GridPoint::new(1.0, 1.0)
        );

        tick_to(&mut playback, 1.4);
        let col = playback.registry().ant("a1").expect("ant").location.col;
        assert!(col > 1.0 && col < 2.0, "{col}");

        tick_to(&mut playback, 1.5);
        assert_eq!(
            playback.registry().ant("a1").expect("ant").location,
            GridPoint::new(1.0, 2.0)
        );
    }

    #[test]
    fn removed_food_is_drawable_until_next_turn() {
        let mut playback = Playback::new(scenario(), 1.0);

        tick_to(&mut playback, 1.8);
        let food = playback.registry().food_at(Cell::new(2, 2)).expect("food");
        assert!(!food.alive);
        assert!(food.size > 0.0);

        tick_to(&mut playback, 1.99);
        assert!(playback.registry().food_at(Cell::new(2, 2)).is_some());

        tick_to(&mut playback, 2.0);
        assert!(playback.registry().food_at(Cell::new(2, 2)).is_none());
    }

    #[test]
    fn removed_ant_is_gone_from_the_following_turn() {
        let mut playback = Playback::new(scenario(), 1.0);

        tick_to(&mut playback, 2.9);
        assert!(!playback.registry().ant("a1").expect("ant").alive);

        tick_to(&mut playback, 3.0);
        assert!(playback.registry().ant("a1").is_none());
    }

    #[test]
    fn attacks_live_through_attack_and_remove_phases() {
        let mut playback = Playback::new(scenario(), 1.0);

        tick_to(&mut playback, 1.45);
        assert!(playback.registry().attacks().is_empty());

        tick_to(&mut playback, 1.5);
        assert_eq!(playback.registry().attacks().len(), 1);
        let attack = &playback.registry().attacks()[0];
        assert_eq!(attack.location, GridPoint::new(1.0, 2.0));
        assert_eq!(attack.target_location, GridPoint::new(2.0, 2.0));

        tick_to(&mut playback, 1.9);
        assert_eq!(playback.registry().attacks().len(), 1);
        assert!(playback.registry().attacks()[0].is_settled());

        tick_to(&mut playback, 2.0);
        assert!(playback.registry().attacks().is_empty());
    }

    #[test]
    fn unknown_event_type_aborts_and_stays_failed() {
        let replay = replay_from_turns(vec![
            json!([]),
            json!([event("Teleport", "Ant", Some("a1"), Some(0), Some([0, 0]), Some([3, 3]))]),
        ]);
        let mut playback = Playback::new(replay, 1.0);

        assert!(playback.tick(0.5).is_ok());
        let expected = PlaybackError::UnknownEventType {
            turn: 1,
            event_type: "Teleport".to_string(),
        };
        assert_eq!(playback.tick(0.6), Err(expected.clone()));
        assert_eq!(playback.tick(0.1), Err(expected.clone()));
        assert_eq!(playback.failure(), Some(&expected));
    }

    #[test]
    fn move_of_unknown_ant_aborts() {
        let replay = replay_from_turns(vec![json!([event(
            "Move",
            "Ant",
            Some("ghost"),
            None,
            Some([0, 0]),
            Some([0, 1])
        )])]);
        let mut playback = Playback::new(replay, 1.0);

        assert!(playback.tick(0.1).is_ok());
        let err = playback.tick(0.2).expect_err("unknown ant");
        assert_eq!(
            err,
            PlaybackError::UnknownEntityReference {
                turn: 0,
                phase: Phase::Move,
                source: RegistryError::UnknownAnt("ghost".to_string()),
            }
        );
    }

    #[test]
    fn attack_by_unknown_ant_aborts() {
        let replay = replay_from_turns(vec![json!([event(
            "Attack",
            "Ant",
            Some("ghost"),
            None,
            Some([0, 0]),
            Some([0, 1])
        )])]);
        let mut playback = Playback::new(replay, 1.0);

        let err = playback.tick(0.6).expect_err("unknown attacker");
        assert!(matches!(
            err,
            PlaybackError::UnknownEntityReference {
                phase: Phase::Attack,
                ..
            }
        ));
    }

    #[test]
    fn entity_kind_invalid_for_phase_aborts() {
        let replay = replay_from_turns(vec![json!([event(
            "Spawn",
            "Hill",
            None,
            Some(0),
            Some([1, 1]),
            None
        )])]);
        let mut playback = Playback::new(replay, 1.0);

        assert_eq!(
            playback.tick(0.0),
            Err(PlaybackError::UnknownEntityKind {
                turn: 0,
                phase: Phase::Spawn,
                entity: "Hill".to_string(),
            })
        );
    }

    #[test]
    fn removing_a_hill_razes_it_in_place() {
        let replay = replay_from_turns(vec![json!([event(
            "Remove",
            "Hill",
            None,
            None,
            Some([3, 3]),
            None
        )])]);
        let mut playback = Playback::new(replay, 1.0);

        playback.tick(0.8).expect("tick");
        let hill = playback.registry().hill_at(Cell::new(3, 3)).expect("hill");
        assert!(!hill.alive);
        assert_eq!(
            hill.kind,
            EntityKind::Hill {
                player: 1,
                sprite: HillSprite::Razed,
            }
        );

        playback.tick(5.0).expect("finish");
        assert!(playback.registry().hill_at(Cell::new(3, 3)).is_some());
    }

    #[test]
    fn pause_and_speed_affect_later_frames_only() {
        let mut playback = Playback::new(scenario(), 1.0);
        playback.tick(0.5).expect("tick");

        playback.set_paused(true);
        playback.tick(10.0).expect("paused tick");
        assert_eq!(playback.clock().elapsed(), 0.5);

        playback.set_paused(false);
        playback.set_speed(4.0);
        playback.tick(0.25).expect("tick");
        assert_eq!(playback.clock().elapsed(), 1.5);
    }

    #[test]
    fn one_large_step_applies_every_slot_in_order() {
        let mut playback = Playback::new(scenario(), 1.0);
        let mut observer = RecordingObserver::default();

        playback.tick_with(2.3, &mut observer).expect("tick");

        let applied: Vec<Slot> = observer.applied.keys().copied().collect();
        assert_eq!(applied, all_slots(3)[..10].to_vec());
        assert_eq!(observer.completed_turns, vec![0, 1]);
        assert!(playback.registry().food_at(Cell::new(2, 2)).is_none());
        assert!(playback.registry().attacks().is_empty());
        assert_eq!(
            playback.registry().ant("a1").expect("ant").location,
            GridPoint::new(1.0, 2.0)
        );
    }

    fn frame_steps() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(
            prop_oneof![0.0f64..0.002, 0.0f64..0.3, 0.3f64..3.0],
            1..80,
        )
    }

    fn final_state(playback: &Playback) -> Vec<Entity> {
        playback.registry().iter_draw_order().cloned().collect()
    }

    proptest! {
        #[test]
        fn every_bucket_applies_exactly_once(steps in frame_steps()) {
            let mut playback = Playback::new(scenario(), 1.0);
            let mut observer = RecordingObserver::default();

            for dt in steps {
                playback.tick_with(dt, &mut observer).expect("tick");
            }
            playback.tick_with(100.0, &mut observer).expect("finish");

            let slots = all_slots(4);
            prop_assert_eq!(observer.applied.len(), slots.len());
            for slot in slots {
                prop_assert_eq!(observer.applied.get(&slot).copied(), Some(1));
                prop_assert!(playback.is_applied(slot));
            }
            prop_assert_eq!(observer.completed_turns, vec![0, 1, 2, 3]);
        }

        #[test]
        fn settled_state_does_not_depend_on_frame_timing(steps in frame_steps()) {
            let mut stepped = Playback::new(scenario(), 1.0);
            for dt in steps {
                stepped.tick(dt).expect("tick");
            }
            stepped.tick(100.0).expect("finish");

            let mut direct = Playback::new(scenario(), 1.0);
            direct.tick(100.0).expect("finish");

            prop_assert_eq!(final_state(&stepped), final_state(&direct));
            prop_assert!(stepped.registry().iter_draw_order().all(Entity::is_settled));
        }
    }
