use super::*;
use proptest::prelude::*;

fn versions(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn loc(pairs: &[(&str, u64)]) -> LineCountMap {
    pairs.iter().map(|(v, n)| (v.to_string(), *n)).collect()
}

#[test]
fn build_three_versions() {
    let vs = versions(&["1.0", "1.1", "2.0"]);
    let m = ComparisonMatrix::build(&vs, &loc(&[("1.0", 100), ("1.1", 120), ("2.0", 200)]));

    assert_eq!(m.size(), 3);
    assert_eq!(m.populated(), 3);

    let rows = m.rows();
    assert!(rows[0].iter().all(Option::is_none));
    let cell = rows[2][0].as_ref().unwrap();
    assert_eq!(cell.left, "2.0");
    assert_eq!(cell.right, "1.0");
    assert_eq!(cell.loc_left, 200);
    assert_eq!(cell.loc_right, 100);
    assert_eq!(cell.matches, None);
    assert!(rows[1][1].is_none());
    assert!(rows[1][2].is_none());
}

#[test]
fn cells_iterate_row_major() {
    let vs = versions(&["a", "b", "c", "d"]);
    let m = ComparisonMatrix::build(&vs, &LineCountMap::new());
    let pairs: Vec<(String, String)> = m
        .cells()
        .map(|c| (c.left.clone(), c.right.clone()))
        .collect();
    let expected: Vec<(String, String)> = [
        ("b", "a"),
        ("c", "a"),
        ("c", "b"),
        ("d", "a"),
        ("d", "b"),
        ("d", "c"),
    ]
    .iter()
    .map(|(l, r)| (l.to_string(), r.to_string()))
    .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn missing_line_counts_default_to_zero() {
    let vs = versions(&["1", "2"]);
    let m = ComparisonMatrix::build(&vs, &loc(&[("2", 50)]));
    let cell = m.cells().next().unwrap();
    assert_eq!(cell.loc_left, 50);
    assert_eq!(cell.loc_right, 0);
}

#[test]
fn empty_and_single_version() {
    assert_eq!(ComparisonMatrix::build(&[], &LineCountMap::new()).populated(), 0);
    let single = ComparisonMatrix::build(&versions(&["1"]), &LineCountMap::new());
    assert_eq!(single.size(), 1);
    assert_eq!(single.populated(), 0);
}

#[test]
fn serializes_as_nested_arrays_with_nulls() {
    let mut m = ComparisonMatrix::build(&versions(&["1", "2"]), &loc(&[("1", 10), ("2", 20)]));
    m.cells_mut().for_each(|c| c.matches = Some(4));
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(
        json,
        r#"[[null,null],[{"left":"2","right":"1","loc_left":20,"loc_right":10,"matches":4},null]]"#
    );
}

#[test]
fn save_and_load_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heatmap.json");
    let mut m = ComparisonMatrix::build(&versions(&["1", "2", "3"]), &LineCountMap::new());
    for (i, c) in m.cells_mut().enumerate() {
        c.matches = Some(i as u64);
    }
    m.save(&path).unwrap();
    assert_eq!(ComparisonMatrix::load(&path).unwrap(), m);
}

#[test]
fn load_reports_bad_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heatmap.json");
    fs::write(&path, "{not json").unwrap();
    let err = ComparisonMatrix::load(&path).unwrap_err();
    assert!(err.to_string().contains("invalid heatmap cache"));
}

#[test]
fn pair_count_small_values() {
    assert_eq!(pair_count(0), 0);
    assert_eq!(pair_count(1), 0);
    assert_eq!(pair_count(2), 1);
    assert_eq!(pair_count(10), 45);
}

proptest! {
    #[test]
    fn only_strictly_lower_cells_are_populated(n in 0usize..25) {
        let vs: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
        let m = ComparisonMatrix::build(&vs, &LineCountMap::new());

        prop_assert_eq!(m.populated(), n * n.saturating_sub(1) / 2);
        let absent = m.rows().iter().flatten().filter(|c| c.is_none()).count();
        prop_assert_eq!(absent, n * n - n * n.saturating_sub(1) / 2);

        for (i, row) in m.rows().iter().enumerate() {
            prop_assert_eq!(row.len(), n);
            for (j, cell) in row.iter().enumerate() {
                prop_assert_eq!(cell.is_some(), j < i);
                if let Some(c) = cell {
                    prop_assert_eq!(&c.left, &vs[i]);
                    prop_assert_eq!(&c.right, &vs[j]);
                }
            }
        }
    }
}
