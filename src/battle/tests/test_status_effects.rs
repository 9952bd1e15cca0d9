#[cfg(test)]
mod tests {
    use crate::battle::engine::{resolve_turn, TurnResolver};
    use crate::battle::rng::ScriptedRng;
    use crate::battle::state::{EventKind, EventPayload};
    use crate::battle::tests::common::{
        agility, create_test_battle, ember, predictable_rng, string_shot, thunder_wave, CombatantBuilder,
    };
    use crate::config::EngineConfig;
    use crate::player::PlayerAction;
    use schema::{StatType, StatusCondition};
    use pretty_assertions::assert_eq;

    const USE_FIRST: PlayerAction = PlayerAction::UseMove { move_index: 0 };

    fn messages(events: &[crate::battle::state::TurnEvent]) -> Vec<&str> {
        events.iter().map(|event| event.message.as_str()).collect()
    }

    #[test]
    fn test_status_move_paralyzes_without_drawing() {
        let (roster_a, roster_b, state) = create_test_battle(
            CombatantBuilder::new("Pikachu", 50)
                .with_speed(150)
                .with_moves(vec![thunder_wave()])
                .build(),
            CombatantBuilder::new("Pidgey", 50).build(),
        );
        // Only B's crit and damage roll are drawn.
        let mut rng = ScriptedRng::new_for_test(vec![99, 15]);

        let outcome = resolve_turn(&state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 1, &mut rng);

        assert_eq!(outcome.state.team_state[1][0].status, Some(StatusCondition::Paralysis));
        assert!(messages(&outcome.result.events)
            .contains(&"Side B's Pidgey is paralyzed! It may be slow to move!"));
        assert_eq!(outcome.state.team_state[1][0].current_hp, 100);
        assert_eq!(outcome.state.team_state[0][0].pp_used, vec![1]);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_status_move_fails_on_statused_target() {
        let (roster_a, roster_b, state) = create_test_battle(
            CombatantBuilder::new("Pikachu", 50)
                .with_speed(150)
                .with_moves(vec![thunder_wave()])
                .build(),
            CombatantBuilder::new("Pidgey", 50)
                .with_status(StatusCondition::Poison)
                .build(),
        );
        let mut rng = predictable_rng();

        let outcome = resolve_turn(&state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 1, &mut rng);

        assert_eq!(outcome.state.team_state[1][0].status, Some(StatusCondition::Poison));
        assert!(messages(&outcome.result.events).contains(&"Side B's Pidgey is already poisoned!"));
    }

    #[test]
    fn test_secondary_burn_then_residual_damage() {
        let (roster_a, roster_b, state) = create_test_battle(
            CombatantBuilder::new("Vulpix", 50)
                .with_speed(150)
                .with_moves(vec![ember()])
                .build(),
            CombatantBuilder::new("Pidgey", 50).build(),
        );
        // A: crit, roll, burn chance 5 (< 10). B: crit, roll.
        let mut rng = ScriptedRng::new_for_test(vec![99, 15, 5, 99, 15]);

        let outcome = resolve_turn(&state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 1, &mut rng);

        // Ember 19, then burn 100 / 16 = 6
        assert_eq!(outcome.state.team_state[1][0].status, Some(StatusCondition::Burn));
        assert_eq!(outcome.state.team_state[1][0].current_hp, 75);

        let last_damage = outcome
            .result
            .events_of(EventKind::Damage)
            .last()
            .expect("residual damage event");
        assert_eq!(last_damage.message, "Side B's Pidgey was hurt by its burn!");
        assert_eq!(last_damage.damage_amount(), Some(6));
    }

    #[test]
    fn test_secondary_effect_misses_on_high_roll() {
        let (roster_a, roster_b, state) = create_test_battle(
            CombatantBuilder::new("Vulpix", 50)
                .with_speed(150)
                .with_moves(vec![ember()])
                .build(),
            CombatantBuilder::new("Pidgey", 50).build(),
        );
        let mut rng = predictable_rng();

        let outcome = resolve_turn(&state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 1, &mut rng);

        assert_eq!(outcome.state.team_state[1][0].status, None);
        assert_eq!(outcome.state.team_state[1][0].current_hp, 81);
    }

    #[test]
    fn test_poison_residual_and_minimum_chip() {
        let (roster_a, roster_b, state) = create_test_battle(
            CombatantBuilder::new("Ekans", 50)
                .with_speed(150)
                .with_hp(10)
                .with_status(StatusCondition::Burn)
                .build(),
            CombatantBuilder::new("Pidgey", 50)
                .with_status(StatusCondition::Poison)
                .build(),
        );
        let mut rng = predictable_rng();

        let outcome = resolve_turn(
            &state,
            &roster_a,
            &roster_b,
            PlayerAction::SwitchPokemon { team_index: 0 },
            PlayerAction::SwitchPokemon { team_index: 0 },
            1,
            &mut rng,
        );

        // 10 / 16 rounds to 0, chip is at least 1. 100 / 8 = 12.
        assert_eq!(outcome.state.team_state[0][0].current_hp, 9);
        assert_eq!(outcome.state.team_state[1][0].current_hp, 88);
    }

    #[test]
    fn test_residual_damage_can_be_disabled() {
        let (roster_a, roster_b, state) = create_test_battle(
            CombatantBuilder::new("Ekans", 50)
                .with_status(StatusCondition::Poison)
                .build(),
            CombatantBuilder::new("Pidgey", 50).build(),
        );
        let config = EngineConfig {
            residual_status_damage: false,
            ..EngineConfig::default()
        };
        let mut rng = predictable_rng();

        let outcome = TurnResolver::new(&config).resolve(
            &state,
            [&roster_a, &roster_b],
            [
                PlayerAction::SwitchPokemon { team_index: 0 },
                PlayerAction::SwitchPokemon { team_index: 0 },
            ],
            1,
            &mut rng,
        );

        assert_eq!(outcome.state.team_state[0][0].current_hp, 100);
        assert!(!outcome.result.has_event(EventKind::Damage));
    }

    #[test]
    fn test_agility_raises_speed_and_caps() {
        let (roster_a, roster_b, mut state) = create_test_battle(
            CombatantBuilder::new("Dodrio", 50)
                .with_speed(150)
                .with_moves(vec![agility()])
                .build(),
            CombatantBuilder::new("Pidgey", 50).build(),
        );
        let mut rng = predictable_rng();

        let outcome = resolve_turn(&state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 1, &mut rng);
        assert_eq!(outcome.state.team_state[0][0].get_stat_stage(StatType::Spe), 2);
        assert!(messages(&outcome.result.events).contains(&"Side A's Dodrio speed rose sharply!"));

        state.team_state[0][0].change_stat_stage(StatType::Spe, 6);
        let mut rng = predictable_rng();
        let capped = resolve_turn(&state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 1, &mut rng);
        assert_eq!(capped.state.team_state[0][0].get_stat_stage(StatType::Spe), 6);
        assert!(messages(&capped.result.events).contains(&"Side A's Dodrio speed won't go any higher!"));
    }

    #[test]
    fn test_speed_drop_changes_next_turn_order() {
        let (roster_a, roster_b, state) = create_test_battle(
            CombatantBuilder::new("Caterpie", 50)
                .with_speed(90)
                .with_moves(vec![string_shot()])
                .build(),
            CombatantBuilder::new("Pidgey", 50).with_speed(100).build(),
        );
        let mut rng = predictable_rng();

        // B moves first this turn, then string shot drops B to 100 * 2/3 = 66.
        let outcome = resolve_turn(&state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 1, &mut rng);
        assert_eq!(outcome.result.events[0].side, Some(crate::player::Side::B));
        assert_eq!(outcome.state.team_state[1][0].get_stat_stage(StatType::Spe), -1);

        let mut rng = predictable_rng();
        let next = resolve_turn(&outcome.state, &roster_a, &roster_b, USE_FIRST, USE_FIRST, 2, &mut rng);
        assert_eq!(next.result.events[0].side, Some(crate::player::Side::A));
        assert!(matches!(
            next.result.events_of(EventKind::Damage).next().map(|event| &event.payload),
            Some(Some(EventPayload::Damage { .. }))
        ));
    }
}
