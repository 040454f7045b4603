mod support;

use std::fs::File;

use dataset_splitter::config::SplitConfig;
use dataset_splitter::core::archive::create_tar_archive;
use dataset_splitter::core::dataset::DatasetSplit;
use dataset_splitter::core::orchestrator::{RunMode, NEGATIVE_GROUP, POSITIVE_GROUP};
use dataset_splitter::{run, RunError};
use tempfile::tempdir;

use support::{count_files, file_names, test_config, write_images};

fn binary_config(source: &std::path::Path, dest: &std::path::Path) -> SplitConfig {
    SplitConfig {
        binary_mode: true,
        positive_class: Some("defect".to_string()),
        ..test_config(source, dest)
    }
}

#[test]
fn balanced_binary_split() {
    let work = tempdir().unwrap();
    let source = work.path().join("source");
    let dest = work.path().join("dest");
    write_images(&source.join("defect/crack"), "crack", 20);
    write_images(&source.join("defect/dent"), "dent", 10);
    write_images(&source.join("ok/front"), "front", 57);
    write_images(&source.join("ok/tiny"), "tiny", 3);
    write_images(&source.join("scratch/side"), "side", 40);

    let config = SplitConfig {
        training_ratio: 0.7,
        ..binary_config(&source, &dest)
    };
    let summary = run(&config).unwrap();

    assert_eq!(summary.mode, RunMode::Binary);
    assert_eq!(summary.target_count, Some(30));
    assert_eq!(count_files(&dest.join("train/positive")), 21);
    assert_eq!(count_files(&dest.join("validation/positive")), 9);
    assert_eq!(count_files(&dest.join("train/negative")), 21);
    assert_eq!(count_files(&dest.join("validation/negative")), 9);
    assert_eq!(summary.transferred_for(DatasetSplit::Train, POSITIVE_GROUP), 21);
    assert_eq!(summary.transferred_for(DatasetSplit::Validation, NEGATIVE_GROUP), 9);
    assert_eq!(summary.batches.len(), 4);

    let positives = file_names(&dest.join("train/positive"));
    assert!(positives
        .iter()
        .all(|n| n.starts_with("crack_") || n.starts_with("dent_")));
    let negatives = file_names(&dest.join("train/negative"));
    assert!(negatives
        .iter()
        .all(|n| !n.starts_with("crack_") && !n.starts_with("dent_")));
}

#[test]
fn binary_mode_pools_sub_classes_below_minimum() {
    let work = tempdir().unwrap();
    let source = work.path().join("source");
    let dest = work.path().join("dest");
    write_images(&source.join("defect/all"), "defect", 100);
    write_images(&source.join("ok/tiny"), "tiny", 3);

    // Non-binary mode would skip ok/tiny (3 < 50); binary mode pools it anyway
    let config = SplitConfig {
        min_file_count: 50,
        training_ratio: 0.7,
        ..binary_config(&source, &dest)
    };
    let summary = run(&config).unwrap();

    assert_eq!(summary.target_count, Some(3));
    assert_eq!(count_files(&dest.join("train/negative")), 2);
    assert_eq!(count_files(&dest.join("validation/negative")), 1);
    assert_eq!(count_files(&dest.join("train/positive")), 2);
    assert_eq!(count_files(&dest.join("validation/positive")), 1);
}

#[test]
fn no_negative_files_is_degenerate_not_fatal() {
    let work = tempdir().unwrap();
    let source = work.path().join("source");
    let dest = work.path().join("dest");
    write_images(&source.join("defect/all"), "defect", 10);

    let summary = run(&binary_config(&source, &dest)).unwrap();
    assert_eq!(summary.target_count, Some(0));
    assert_eq!(summary.total_transferred(), 0);
    assert!(!dest.join("train/positive").exists());
}

#[test]
fn empty_positive_class_is_fatal() {
    let work = tempdir().unwrap();
    let source = work.path().join("source");
    write_images(&source.join("ok/all"), "ok", 10);
    std::fs::create_dir_all(source.join("defect/empty")).unwrap();

    let result = run(&binary_config(&source, &work.path().join("dest")));
    match result {
        Err(RunError::EmptyPositiveClass { class }) => assert_eq!(class, "defect"),
        other => panic!("expected EmptyPositiveClass, got {:?}", other.map(|s| s.mode)),
    }
}

#[test]
fn binary_mode_without_positive_class_is_rejected() {
    let work = tempdir().unwrap();
    let source = work.path().join("source");
    write_images(&source.join("ok/all"), "ok", 10);

    let config = SplitConfig {
        positive_class: None,
        ..binary_config(&source, &work.path().join("dest"))
    };
    assert!(matches!(run(&config), Err(RunError::Config(_))));
}

#[test]
fn output_tree_can_be_archived() {
    let work = tempdir().unwrap();
    let source = work.path().join("source");
    let dest = work.path().join("dest");
    write_images(&source.join("defect/all"), "defect", 4);
    write_images(&source.join("ok/all"), "ok", 4);

    let config = SplitConfig {
        training_ratio: 0.5,
        ..binary_config(&source, &dest)
    };
    run(&config).unwrap();

    let archive = work.path().join("dest.tar");
    create_tar_archive(&dest, &archive).unwrap();

    let mut reader = tar::Archive::new(File::open(&archive).unwrap());
    let files = reader
        .entries()
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.header().entry_type().is_file())
        .count();
    assert_eq!(files, 8);
}
