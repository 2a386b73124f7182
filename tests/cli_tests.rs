//! End-to-end tests of the `kiln` binary.
//!
//! Each test works in its own temporary directory and passes relative paths,
//! so manifest contents are stable across machines.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kiln(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kiln").expect("binary should build");
    cmd.current_dir(dir);
    cmd
}

fn write_fasta(dir: &Path, name: &str, header: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!(">{header}\nACGTACGT\n")).unwrap();
}

fn setup(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in files {
        write_fasta(dir.path(), name, "seq1 test sequence");
    }
    dir
}

#[test]
fn test_build_strip_extension() {
    let dir = setup(&["genomeA.fasta", "genomeB.fasta"]);

    kiln(dir.path())
        .args(["build", "genomeA.fasta", "genomeB.fasta", "-o", "out.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 2 entries to 'out.csv'"));

    assert_eq!(
        fs::read_to_string(dir.path().join("out.csv")).unwrap(),
        "ident,name,genome_filename,protein_filename\n\
         genomeA,genomeA,genomeA.fasta,\n\
         genomeB,genomeB,genomeB.fasta,\n"
    );
}

#[test]
fn test_build_conflict_writes_nothing() {
    let dir = setup(&["x.fasta", "x.fa"]);

    kiln(dir.path())
        .args(["build", "x.fasta", "x.fa", "-o", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("x.fasta").and(predicate::str::contains("x.fa")));

    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_build_merges_genome_and_proteome() {
    let dir = setup(&["GCF_1_a.fna", "GCF_1_a.faa"]);

    kiln(dir.path())
        .args([
            "build",
            "GCF_1_a.fna",
            "GCF_1_a.faa",
            "--ident-rule",
            "prefix",
            "-o",
            "out.csv",
        ])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("out.csv")).unwrap(),
        "ident,name,genome_filename,protein_filename\n\
         GCF_1,GCF_1,GCF_1_a.fna,GCF_1_a.faa\n"
    );
}

#[test]
fn test_build_same_file_with_dot_prefix() {
    let dir = setup(&["a.fna"]);

    kiln(dir.path())
        .args(["build", "a.fna", "./a.fna", "-o", "out.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 1 entries"));
}

#[test]
fn test_build_is_deterministic() {
    let dir = setup(&["g/b.fna", "g/a.fna", "p/a.faa"]);

    for out in ["one.csv", "two.csv"] {
        kiln(dir.path())
            .args(["build", "g", "p", "-o", out])
            .assert()
            .success();
    }

    let one = fs::read(dir.path().join("one.csv")).unwrap();
    let two = fs::read(dir.path().join("two.csv")).unwrap();
    assert_eq!(one, two);
}

#[test]
fn test_build_refuses_to_overwrite() {
    let dir = setup(&["a.fna"]);
    fs::write(dir.path().join("out.csv"), "keep me\n").unwrap();

    kiln(dir.path())
        .args(["build", "a.fna", "-o", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.csv")).unwrap(),
        "keep me\n"
    );

    kiln(dir.path())
        .args(["build", "a.fna", "-o", "out.csv", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(dir.path().join("out.csv"))
        .unwrap()
        .starts_with("ident,name"));
}

#[test]
fn test_build_rejects_unknown_extension() {
    let dir = setup(&[]);
    fs::write(dir.path().join("notes.txt"), "hello\n").unwrap();

    kiln(dir.path())
        .args(["build", "notes.txt", "-o", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized extension"));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_build_md5_needs_files_layout() {
    let dir = setup(&["a.fna"]);

    kiln(dir.path())
        .args(["build", "a.fna", "--md5", "-o", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("files"));

    kiln(dir.path())
        .args(["build", "a.fna", "--md5", "--layout", "files", "-o", "out.csv"])
        .assert()
        .success();

    let digest = format!("{:x}", md5::compute(fs::read(dir.path().join("a.fna")).unwrap()));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.csv")).unwrap(),
        format!("ident,name,filepath,md5,moltype\na,a,a.fna,{digest},DNA\n")
    );
}

#[test]
fn test_build_from_list_and_json_summary() {
    let dir = setup(&["a.fna", "b.faa"]);
    fs::write(dir.path().join("list.txt"), "# sources\na.fna\n\nb.faa\n").unwrap();

    kiln(dir.path())
        .args(["build", "--from-list", "list.txt", "-o", "out.csv", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entries\": 2"))
        .stdout(predicate::str::contains("\"proteomes\": 1"));
}

#[test]
fn test_build_header_rule() {
    let dir = tempfile::tempdir().unwrap();
    write_fasta(dir.path(), "one.fna", "GCF_9 Escherichia coli K-12");

    kiln(dir.path())
        .args(["build", "one.fna", "--ident-rule", "header", "-o", "out.csv"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("out.csv")).unwrap(),
        "ident,name,genome_filename,protein_filename\n\
         GCF_9,GCF_9 Escherichia coli K-12,one.fna,\n"
    );
}

#[test]
fn test_extract_round_trip() {
    let dir = setup(&["a.fna", "a.faa", "b.fna"]);

    kiln(dir.path())
        .args(["build", "a.fna", "a.faa", "b.fna", "-o", "built.csv"])
        .assert()
        .success();
    kiln(dir.path())
        .args(["extract", "built.csv", "-o", "extracted.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 2 entries"));

    assert_eq!(
        fs::read(dir.path().join("built.csv")).unwrap(),
        fs::read(dir.path().join("extracted.csv")).unwrap()
    );
}

#[test]
fn test_extract_conflict_names_both_manifests() {
    let dir = setup(&[]);
    fs::write(
        dir.path().join("one.csv"),
        "ident,name,genome_filename,protein_filename\na,a,a.fna,\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("two.csv"),
        "ident,name,genome_filename,protein_filename\na,a,other/a.fna,\n",
    )
    .unwrap();

    kiln(dir.path())
        .args(["extract", "one.csv", "two.csv", "-o", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("one.csv").and(predicate::str::contains("two.csv")));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_rename_dry_run_then_apply() {
    let dir = setup(&["gA.fasta", "gB.fna"]);
    fs::write(dir.path().join("map.csv"), "old,new\ngA,genome_a\n").unwrap();

    kiln(dir.path())
        .args(["rename", "gA.fasta", "gB.fna", "--mapping", "map.csv", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would rename 'gA.fasta' -> 'genome_a.fasta'"))
        .stdout(predicate::str::contains("1 skipped"));
    assert!(dir.path().join("gA.fasta").exists());

    kiln(dir.path())
        .args(["rename", "gA.fasta", "gB.fna", "--mapping", "map.csv"])
        .assert()
        .success();
    assert!(dir.path().join("genome_a.fasta").exists());
    assert!(!dir.path().join("gA.fasta").exists());
    assert!(dir.path().join("gB.fna").exists());
}

#[test]
fn test_rename_rejects_new_names_outside_directory() {
    let dir = setup(&["genomes/a.fa", "genomes/b.fa"]);
    fs::write(
        dir.path().join("map.csv"),
        "old,new\na,ok\nb,../escaped\n",
    )
    .unwrap();

    kiln(dir.path())
        .args(["rename", "genomes/a.fa", "genomes/b.fa", "--mapping", "map.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path separator"));
    assert!(dir.path().join("genomes/a.fa").exists());
    assert!(dir.path().join("genomes/b.fa").exists());
    assert!(!dir.path().join("escaped.fa").exists());
}

#[test]
fn test_rename_collision_fails_before_renaming() {
    let dir = setup(&["a.fna", "b.fna"]);
    fs::write(dir.path().join("map.csv"), "old,new\na,same\nb,same\n").unwrap();

    kiln(dir.path())
        .args(["rename", "a.fna", "b.fna", "--mapping", "map.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conflicting"));
    assert!(dir.path().join("a.fna").exists());
    assert!(dir.path().join("b.fna").exists());
}

#[test]
fn test_plan_skips_existing_sketches() {
    let dir = setup(&["a.fna", "b.fna"]);
    kiln(dir.path())
        .args(["build", "a.fna", "b.fna", "-o", "fromfile.csv"])
        .assert()
        .success();
    fs::write(
        dir.path().join("done.csv"),
        "# SOURMASH-MANIFEST-VERSION: 1.0\n\
         internal_location,md5,md5short,ksize,moltype,num,scaled,n_hashes,with_abundance,name,filename\n\
         x.sig,m,m,31,DNA,0,1000,10,0,a,a.fna\n",
    )
    .unwrap();

    kiln(dir.path())
        .args([
            "plan",
            "fromfile.csv",
            "-p",
            "dna,k=21,k=31",
            "--already-done",
            "done.csv",
            "-o",
            "jobs.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 sketches requested, 1 already done, 3 to build"));

    assert_eq!(
        fs::read_to_string(dir.path().join("jobs.csv")).unwrap(),
        "name,filename,moltype,ksize,scaled,num,with_abundance\n\
         a,a.fna,DNA,21,1000,0,0\n\
         b,b.fna,DNA,21,1000,0,0\n\
         b,b.fna,DNA,31,1000,0,0\n"
    );
}

#[test]
fn test_plan_rejects_bad_params() {
    let dir = setup(&["a.fna"]);
    kiln(dir.path())
        .args(["build", "a.fna", "-o", "fromfile.csv"])
        .assert()
        .success();

    kiln(dir.path())
        .args(["plan", "fromfile.csv", "-p", "k=31", "-o", "jobs.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No molecule type"));
    assert!(!dir.path().join("jobs.csv").exists());
}
