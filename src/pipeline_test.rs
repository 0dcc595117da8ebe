use super::*;
use crate::cli::Language;
use crate::compare::CompareError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reports a fixed number of matches per pair and counts its calls.
#[derive(Default)]
struct FixedComparator {
    calls: AtomicUsize,
}

impl Comparator for FixedComparator {
    fn name(&self) -> &str {
        "fixed"
    }

    fn compare(&self, left: &Path, _right: &Path) -> Result<u64, CompareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // More recent left versions share more lines.
        let name = left.file_name().unwrap().to_string_lossy();
        Ok(if name == "1.10" { 40 } else { 10 })
    }
}

struct Workspace {
    _dir: tempfile::TempDir,
    args: CompareArgs,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    for v in ["1.2", "1.10", "1.9"] {
        fs::create_dir_all(input.join(v)).unwrap();
    }
    let sep = std::path::MAIN_SEPARATOR;
    let cloc = dir.path().join("cloc.csv");
    fs::write(
        &cloc,
        format!(
            "language,filename,blank,comment,code,\"github.com/AlDanial/cloc v 2.00  T=0.02 s (150.0 files/s, 22500.0 lines/s)\"\n\
             PHP,input{sep}1.2{sep}a.php,0,0,100\n\
             PHP,input{sep}1.9{sep}a.php,0,0,150\n\
             PHP,input{sep}1.10{sep}a.php,0,0,200\n\
             SUM,,0,0,450\n"
        ),
    )
    .unwrap();

    let output = dir.path().join("output");
    let args = CompareArgs {
        language: Language::Php,
        input_dir: input,
        input_sub_dir: None,
        output_dir: output.clone(),
        use_cloc_cache: true,
        cloc_cache_file: cloc,
        use_heatmap_cache: false,
        heatmap_cache_file: output.join(HEATMAP_CACHE),
        batch_size: None,
        json: false,
    };
    Workspace { _dir: dir, args }
}

#[test]
fn run_writes_reports_and_cache() {
    let ws = workspace();
    let comparator = FixedComparator::default();
    let summary = run_with(&ws.args, &Config::default(), &comparator).unwrap();

    assert_eq!(comparator.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        summary.comparisons,
        BatchStats {
            total: 3,
            processed: 3,
            failed: 0
        }
    );
    assert!(!summary.matrix_from_cache);

    let names: Vec<&str> = summary.versions.iter().map(|r| r.version.as_str()).collect();
    assert_eq!(names, ["1.2", "1.9", "1.10"]);
    assert_eq!(summary.versions[2].lines, 200);

    for file in [report::BARCHART_FILE, report::HEATMAP_FILE, HEATMAP_CACHE] {
        assert!(ws.args.output_dir.join(file).is_file(), "{file} missing");
    }
    assert_eq!(summary.reports.len(), 3);
}

#[test]
fn cache_holds_raw_counts_only() {
    let ws = workspace();
    run_with(&ws.args, &Config::default(), &FixedComparator::default()).unwrap();

    let cached = ComparisonMatrix::load(&ws.args.output_dir.join(HEATMAP_CACHE)).unwrap();
    assert_eq!(cached.size(), 3);
    for cell in cached.cells() {
        assert!(cell.matches.is_some());
        assert_eq!(cell.ratio, None);
        assert_eq!(cell.color, None);
    }
}

#[test]
fn heatmap_cache_skips_comparisons() {
    let ws = workspace();
    run_with(&ws.args, &Config::default(), &FixedComparator::default()).unwrap();

    let mut args = ws.args.clone();
    args.use_heatmap_cache = true;
    let comparator = FixedComparator::default();
    let summary = run_with(&args, &Config::default(), &comparator).unwrap();

    assert_eq!(comparator.calls.load(Ordering::SeqCst), 0);
    assert!(summary.matrix_from_cache);
    assert_eq!(summary.comparisons.processed, 3);
    assert_eq!(summary.reports.len(), 2);
}

#[test]
fn missing_cache_fails_before_work() {
    let ws = workspace();
    let mut args = ws.args.clone();
    args.use_heatmap_cache = true;
    let err = run_with(&args, &Config::default(), &FixedComparator::default()).unwrap_err();
    assert!(err.to_string().contains("not found"));
    assert!(!args.output_dir.exists());
}

#[test]
fn zero_batch_size_is_rejected() {
    let ws = workspace();
    let mut args = ws.args.clone();
    args.batch_size = Some(0);
    let err = run_with(&args, &Config::default(), &FixedComparator::default()).unwrap_err();
    assert!(err.to_string().contains("batch-size"));
}

#[test]
fn missing_input_dir_is_fatal() {
    let ws = workspace();
    let mut args = ws.args.clone();
    args.input_dir = args.input_dir.join("nope");
    assert!(run_with(&args, &Config::default(), &FixedComparator::default()).is_err());
}

#[test]
fn most_similar_pair_is_red() {
    let ws = workspace();
    run_with(&ws.args, &Config::default(), &FixedComparator::default()).unwrap();
    let html = fs::read_to_string(ws.args.output_dir.join(report::HEATMAP_FILE)).unwrap();
    assert!(html.contains("background:rgb(255,0,0)"));
    assert!(html.contains("background:rgb(255,255,255)"));
}

#[test]
fn output_prints_table_and_json() {
    let ws = workspace();
    let summary = run_with(&ws.args, &Config::default(), &FixedComparator::default()).unwrap();
    output(&summary, false).unwrap();
    output(&summary, true).unwrap();
}
