use dice_selector::{
    DiceError, DiceSelector, Die, DieCollection, Select, Sides, Strictness, Value,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

/// Dice showing `values`, rolled with a die whose only faces are that value.
fn dice_showing<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Vec<Die> {
    values
        .into_iter()
        .map(|v| {
            let v = v.into();
            let mut die = Die::new(Sides::new([v.clone(), v]).unwrap());
            die.roll(&mut seeded(), 1).unwrap();
            die
        })
        .collect()
}

fn positions(dice: &[Die], selected: &DieCollection) -> Vec<usize> {
    selected
        .iter()
        .map(|s| dice.iter().position(|d| d.id() == s.id()).unwrap())
        .collect()
}

fn select(selector: &DiceSelector, dice: &[Die]) -> Result<Vec<usize>, DiceError> {
    let pool: DieCollection = dice.iter().collect();
    Ok(positions(dice, &selector.select_with(&pool, &mut seeded())?))
}

#[test]
fn highest_one_of_eight() {
    let dice = dice_showing([3, 1, 4, 1, 5, 9, 2, 6]);
    let pool: DieCollection = dice.iter().collect();
    let selected = DiceSelector::highest(1).unwrap().select(&pool).unwrap();
    assert_eq!(selected.values().unwrap(), vec![&Value::Int(9)]);
    assert_eq!(positions(&dice, &selected), vec![5]);
}

#[test]
fn lowest_three_in_original_order() {
    let dice = dice_showing([5, 3, 8, 1, 9, 2]);
    let pool: DieCollection = dice.iter().collect();
    let selected = DiceSelector::lowest(3).unwrap().select(&pool).unwrap();
    assert_eq!(
        selected.values().unwrap(),
        vec![&Value::Int(3), &Value::Int(1), &Value::Int(2)]
    );
    assert_eq!(positions(&dice, &selected), vec![1, 3, 5]);
}

#[test]
fn less_than_four() {
    let dice = dice_showing([2, 5, 3, 6, 3, 4, 2, 4, 5, 3, 1]);
    assert_eq!(
        select(&DiceSelector::less_than(4).unwrap(), &dice),
        Ok(vec![0, 2, 4, 6, 9, 10])
    );
}

#[test]
fn equal_to_numeric_string() {
    let dice = dice_showing([4]);
    assert_eq!(select(&DiceSelector::equal_to("4", false).unwrap(), &dice), Ok(vec![0]));
    assert_eq!(select(&DiceSelector::equal_to("4", true).unwrap(), &dice), Ok(vec![]));
}

#[test]
fn less_than_and_greater_or_equal_partition() {
    let dice = dice_showing([Value::from(2), Value::from(5.5), Value::from("3"), Value::from(4), Value::from(7)]);
    for threshold in [0, 3, 4, 5, 8] {
        let mut below = select(&DiceSelector::less_than(threshold).unwrap(), &dice).unwrap();
        let above = select(&DiceSelector::greater_than_or_equal_to(threshold).unwrap(), &dice).unwrap();
        assert!(below.iter().all(|i| !above.contains(i)));
        below.extend(above);
        below.sort_unstable();
        assert_eq!(below, (0..dice.len()).collect::<Vec<_>>());
    }
}

#[test]
fn filters_are_ordered_subsequences() {
    let dice = dice_showing([6, 1, 4, 4, 2, 6, 3]);
    let selectors = [
        DiceSelector::all(),
        DiceSelector::equal_to(4, false).unwrap(),
        DiceSelector::less_than_or_equal_to(3).unwrap(),
        DiceSelector::greater_than(3).unwrap(),
        DiceSelector::in_set([6, 1], true).unwrap(),
        DiceSelector::these([&dice[5], &dice[0], &dice[3]]),
    ];
    for selector in &selectors {
        let picked = select(selector, &dice).unwrap();
        assert!(picked.windows(2).all(|w| w[0] < w[1]), "{} out of order", selector);
    }
}

#[test]
fn all_keeps_values_and_order() {
    let dice = dice_showing(["b", "a", "c"]);
    let pool: DieCollection = dice.iter().collect();
    let selected = DiceSelector::all().select(&pool).unwrap();
    assert_eq!(selected.values(), pool.values());
    assert_eq!(selected, pool);
}

#[test]
fn random_returns_exactly_k() {
    let dice = dice_showing(1..=8);
    let pool: DieCollection = dice.iter().collect();
    let mut roller = seeded();
    for k in 0..=8 {
        let selected = DiceSelector::random(k).select_with(&pool, &mut roller).unwrap();
        let picked = positions(&dice, &selected);
        assert_eq!(picked.len(), k);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }
    assert!(matches!(
        DiceSelector::random(9).select(&pool),
        Err(DiceError::InvalidArgument(_))
    ));
}

#[test]
fn random_is_reproducible_with_seed() {
    let dice = dice_showing(1..=20);
    let pool: DieCollection = dice.iter().collect();
    let selector = DiceSelector::random(5);
    let a = selector.select_with(&pool, &mut seeded()).unwrap();
    let b = selector.select_with(&pool, &mut seeded()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn these_empty_selects_nothing() {
    let dice = dice_showing([1, 2, 3]);
    assert_eq!(select(&DiceSelector::these([]), &dice), Ok(vec![]));
}

#[test]
fn empty_collection_gives_empty_result() {
    let selectors = [
        DiceSelector::highest(2).unwrap(),
        DiceSelector::lowest(1).unwrap(),
        DiceSelector::equal_to(1, true).unwrap(),
        DiceSelector::less_than(1).unwrap(),
        DiceSelector::less_than_or_equal_to(1).unwrap(),
        DiceSelector::greater_than(1).unwrap(),
        DiceSelector::greater_than_or_equal_to(1).unwrap(),
        DiceSelector::in_set([1], false).unwrap(),
        DiceSelector::all(),
        DiceSelector::these([]),
        DiceSelector::random(0),
    ];
    for selector in &selectors {
        assert_eq!(select(selector, &[]), Ok(vec![]), "{}", selector);
    }
}

#[test]
fn selectors_are_shareable_across_threads() {
    let selector = DiceSelector::lowest(2).unwrap();
    std::thread::scope(|scope| {
        for offset in 0..4 {
            let selector = &selector;
            scope.spawn(move || {
                let dice = dice_showing([offset + 3, offset + 1, offset + 2]);
                assert_eq!(select(selector, &dice), Ok(vec![1, 2]));
            });
        }
    });
}

#[test]
fn notation_drives_selection() {
    let dice = dice_showing([6, 2, 5, 1, 4, 3]);
    let selector: DiceSelector = "h4 <6 l1".parse().unwrap();
    assert_eq!(select(&selector, &dice), Ok(vec![5]));

    let err = "h0".parse::<DiceSelector>().unwrap_err();
    assert!(matches!(err, DiceError::Parse(_)));
}

#[test]
fn strict_comparison_mismatch_is_reported() {
    let dice = dice_showing([Value::from(1), Value::from("x")]);
    let pool: DieCollection = dice.iter().collect();
    let selector = dice_selector::select::GreaterThanSelector::new(0, Strictness::Strict).unwrap();
    assert_eq!(
        selector.select(&pool),
        Err(DiceError::TypeMismatch {
            left: Value::from("x"),
            right: Value::from(0),
        })
    );
}

#[test]
fn rolled_dice_feed_selectors() {
    let mut roller = seeded();
    let mut dice: Vec<Die> = (0..6).map(|_| Die::d(6).unwrap()).collect();
    for die in &mut dice {
        die.enable_history(true).roll(&mut roller, 2).unwrap();
        assert_eq!(die.history().len(), 2);
    }
    let pool: DieCollection = dice.iter().collect();
    let kept = DiceSelector::highest(3).unwrap().select(&pool).unwrap();
    let dropped = DiceSelector::lowest(3).unwrap().select(&pool).unwrap();
    assert_eq!(kept.count(), 3);

    let min_kept = kept.iter().map(|d| d.value().unwrap()).filter_map(|v| match v {
        Value::Int(x) => Some(*x),
        _ => None,
    });
    let max_dropped = dropped.iter().map(|d| d.value().unwrap()).filter_map(|v| match v {
        Value::Int(x) => Some(*x),
        _ => None,
    });
    assert!(min_kept.min() >= max_dropped.max());
}
