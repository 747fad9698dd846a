use outfitter::data::{Catalog, Denylist, Item, ItemStats};
use outfitter::optimizer::{filter_candidates, PlatformCoefficients};

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

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next() % (hi - lo + 1) as u64) as i64
    }
}

fn random_catalog(rng: &mut Lcg, count: usize) -> Catalog {
    Catalog::from_items((0..count).map(|i| {
        item(
            &format!("Outfit {i}"),
            -(rng.range(1, 8) as i32),
            rng.range(0, 10) as f64,
            rng.range(0, 6) as f64,
            rng.range(0, 4) as f64,
        )
    }))
}

#[test]
fn filtering_the_survivors_again_changes_nothing() {
    let mut rng = Lcg(2024);
    for coefficients in [
        PlatformCoefficients::new(1.0, 0.0),
        PlatformCoefficients::new(0.6, 0.0),
    ] {
        for _ in 0..40 {
            let catalog = random_catalog(&mut rng, 12);
            let once = filter_candidates(&catalog, coefficients, &Denylist::empty());
            let twice = filter_candidates(&once.to_catalog(), coefficients, &Denylist::empty());
            assert_eq!(
                once.names().collect::<Vec<_>>(),
                twice.names().collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn survivors_keep_catalog_order_and_are_all_productive() {
    let mut rng = Lcg(99);
    let catalog = random_catalog(&mut rng, 20);
    let kept = filter_candidates(&catalog, PlatformCoefficients::new(1.0, 0.0), &Denylist::empty());

    let order: Vec<&str> = catalog.outfits().iter().map(|o| o.name.as_str()).collect();
    let mut last = None;
    for candidate in kept.items() {
        assert!(candidate.is_productive());
        let position = order.iter().position(|name| *name == candidate.name);
        assert!(position > last, "{} is out of catalog order", candidate.name);
        last = position;
    }
}

#[test]
fn empty_catalog_yields_empty_set() {
    let kept = filter_candidates(
        &Catalog::new(),
        PlatformCoefficients::new(1.0, 0.0),
        &Denylist::default(),
    );
    assert!(kept.is_empty());
}

#[test]
fn lone_eligible_outfit_survives() {
    let catalog = Catalog::from_items([item("Only Reactor", -10, 1.0, 50.0, 0.0)]);
    let kept = filter_candidates(&catalog, PlatformCoefficients::new(1.0, 0.0), &Denylist::empty());
    assert_eq!(kept.names().collect::<Vec<_>>(), vec!["Only Reactor"]);
}

#[test]
fn identical_outfits_prune_each_other() {
    // Each copy is matched by the other plus the null item, and the filter does not
    // re-check against survivors.
    let catalog = Catalog::from_items([
        item("Reactor Mk I", -3, 4.0, 1.0, 0.0),
        item("Reactor Mk I (Refit)", -3, 4.0, 1.0, 0.0),
        item("Fan", -1, 0.0, 0.0, 2.0),
    ]);
    let kept = filter_candidates(&catalog, PlatformCoefficients::new(1.0, 0.0), &Denylist::empty());
    assert_eq!(kept.names().collect::<Vec<_>>(), vec!["Fan"]);
}

#[test]
fn custom_denylist_is_honored() {
    let catalog = Catalog::from_items([
        item("Solar Cell", -2, 1.0, 0.0, 0.0),
        item("Fusion Reactor", -5, 8.0, 2.0, 0.0),
    ]);
    let denylist = Denylist::from_names(["Fusion Reactor"]);
    let kept = filter_candidates(&catalog, PlatformCoefficients::new(1.0, 0.0), &denylist);
    assert_eq!(kept.names().collect::<Vec<_>>(), vec!["Solar Cell"]);
}
