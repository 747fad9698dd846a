use outfitter::data::{Catalog, Denylist, Item, ItemStats, Ship};
use outfitter::optimizer::{
    expansion_sweep, prune_for_ship, single_search, SearchMode, SearchOptions,
};
use outfitter::report::render_loadout;
use outfitter::OutfitterError;

fn item(name: &str, space: i32, energy: f64, heat: f64, cooling: f64) -> Item {
    Item::new(
        name,
        ItemStats {
            space,
            energy,
            heat,
            cooling,
            ..ItemStats::default()
        },
    )
}

fn expansion(cargo_space: i32) -> Item {
    Item::new(
        "Outfits Expansion",
        ItemStats {
            space: 10,
            cargo_space,
            expansions: 1,
            ..ItemStats::default()
        },
    )
}

fn hull(space: i32, cargo_space: i32) -> Ship {
    Ship::new(
        "Test Hull",
        ItemStats {
            space,
            cargo_space,
            ..ItemStats::default()
        },
    )
}

fn catalog() -> Catalog {
    Catalog::from_parts(
        [
            item("A", -1, 5.0, 2.0, 0.0),
            item("B", -1, 0.0, 0.0, 3.0),
            expansion(-15),
        ],
        [hull(2, 30)],
    )
}

fn fine_options() -> SearchOptions {
    SearchOptions {
        heat_step: 0.001,
        ..SearchOptions::default()
    }
}

#[test]
fn single_search_fits_the_best_loadout() {
    let ship = hull(2, 30);
    let report = single_search(&ship, &catalog(), &Denylist::empty(), &SearchOptions::default())
        .expect("search");

    assert_eq!(report.candidate_count, 2);
    assert_eq!(report.result.output, Some(5.0));
    assert_eq!(report.before, ship);
    assert_eq!(report.after.stats.space, 0);
    assert_eq!(report.after.stats.energy, 5.0);
    assert!(report.after.net_heat() <= 0.0);
}

#[test]
fn parallel_single_search_matches_sequential() {
    let ship = hull(6, 0);
    let sequential = single_search(&ship, &catalog(), &Denylist::empty(), &fine_options())
        .expect("sequential");
    let parallel = single_search(
        &ship,
        &catalog(),
        &Denylist::empty(),
        &SearchOptions {
            mode: SearchMode::Parallel,
            ..fine_options()
        },
    )
    .expect("parallel");
    assert_eq!(parallel.result.output, sequential.result.output);
    assert_eq!(parallel.result.leftover, sequential.result.leftover);
    assert_eq!(parallel.after, sequential.after);
}

#[test]
fn infeasible_search_leaves_ship_untouched() {
    let mut ship = hull(1, 0);
    ship.stats.heat = 100.0;
    let report =
        single_search(&ship, &catalog(), &Denylist::empty(), &fine_options()).expect("search");
    assert!(!report.result.is_feasible());
    assert_eq!(report.after, ship);
}

#[test]
fn sweep_steps_through_every_expansion_cargo_allows() {
    let ship = hull(2, 30);
    let steps =
        expansion_sweep(&ship, &catalog(), &Denylist::empty(), &fine_options()).expect("sweep");

    let counts: Vec<i32> = steps.iter().map(|step| step.expansions).collect();
    assert_eq!(counts, vec![0, 1]);

    let first = &steps[0].report;
    let second = &steps[1].report;
    assert_eq!(first.result.output, Some(5.0));
    assert_eq!(second.before.stats.space, 12);
    assert!(second.coefficients.cooling_inefficiency < first.coefficients.cooling_inefficiency);
    assert!(second.result.output > first.result.output);
    assert!(second.after.net_heat() <= 0.0);
}

#[test]
fn sweep_without_cargo_space_is_empty() {
    let steps = expansion_sweep(&hull(5, 0), &catalog(), &Denylist::empty(), &fine_options())
        .expect("sweep");
    assert!(steps.is_empty());
}

#[test]
fn sweep_rejects_missing_or_cargo_free_expansion() {
    let ship = hull(2, 30);
    let no_expansion = Catalog::from_items([item("A", -1, 5.0, 2.0, 0.0)]);
    let err = expansion_sweep(&ship, &no_expansion, &Denylist::empty(), &fine_options())
        .unwrap_err();
    assert!(matches!(err, OutfitterError::MissingExpansion(_)));

    let free_expansion = Catalog::from_items([item("A", -1, 5.0, 2.0, 0.0), expansion(0)]);
    let err = expansion_sweep(&ship, &free_expansion, &Denylist::empty(), &fine_options())
        .unwrap_err();
    assert!(matches!(err, OutfitterError::InvalidExpansion { cargo_space: 0, .. }));
}

#[test]
fn invalid_heat_step_is_rejected() {
    let options = SearchOptions {
        heat_step: 0.0,
        ..SearchOptions::default()
    };
    let err = single_search(&hull(2, 0), &catalog(), &Denylist::empty(), &options).unwrap_err();
    assert!(matches!(err, OutfitterError::InvalidHeatStep(_)));
}

#[test]
fn prune_uses_the_ship_coefficients() {
    let candidates = prune_for_ship(&hull(2, 0), &catalog(), &Denylist::empty());
    assert_eq!(candidates.names().collect::<Vec<_>>(), vec!["A", "B"]);

    let denied = prune_for_ship(&hull(2, 0), &catalog(), &Denylist::from_names(["B"]));
    assert_eq!(denied.names().collect::<Vec<_>>(), vec!["A"]);
}

#[test]
fn capped_search_is_flagged_in_the_report() {
    let bay_catalog = Catalog::from_items([
        item("Bay", 1, 0.5, 1.0, 0.0),
        item("Reactor", -3, 10.0, 0.0, 0.0),
    ]);
    let mut ship = hull(1, 0);
    ship.stats.cooling = 2.0;

    let report = single_search(&ship, &bay_catalog, &Denylist::empty(), &SearchOptions::default())
        .expect("search");
    assert_eq!(report.candidate_count, 2);
    assert!(report.result.is_truncated());
    assert!(render_loadout(&report).contains("install cap reached"));

    let uncapped = single_search(&hull(2, 0), &catalog(), &Denylist::empty(), &fine_options())
        .expect("search");
    assert!(!uncapped.result.is_truncated());
    assert!(!render_loadout(&uncapped).contains("install cap"));
}
