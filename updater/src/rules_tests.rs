//! Tests for the manifest rewrite rules.

use super::*;
use crate::error::ManifestError;
use rstest::rstest;

const UPSTREAM: &str = include_str!("../tests/fixtures/upstream_manifest.xml");
const SCRIPT_SHA1: &str = "11f6ad8ec52a2984abaafd7c3b516503785c2072";

fn upstream() -> Manifest {
    Manifest::parse(UPSTREAM.as_bytes()).expect("parse upstream fixture")
}

fn rewritten(game: Game) -> (Manifest, RewriteSummary) {
    let mut manifest = upstream();
    let summary = rewrite_with(&mut manifest, game, || Ok(Sha1Digest::of_bytes(b"x")))
        .expect("rewrite fixture");
    (manifest, summary)
}

fn children_named<'a>(
    manifest: &'a Manifest,
    tag: &'a str,
) -> impl Iterator<Item = &'a Element> {
    manifest.root().children.iter().filter(move |e| e.name() == tag)
}

fn file_named<'a>(manifest: &'a Manifest, name: &str) -> Option<&'a Element> {
    children_named(manifest, FILE_TAG).find(|e| e.attribute("name") == Some(name))
}

#[rstest]
#[case::poe1(Game::Poe1)]
#[case::poe2(Game::Poe2)]
fn exactly_one_default_source_points_at_hosted_url(#[case] game: Game) {
    let (manifest, _) = rewritten(game);
    let defaults: Vec<&Element> = children_named(&manifest, SOURCE_TAG)
        .filter(|e| e.attribute(PART) == Some(PART_DEFAULT))
        .collect();

    assert_eq!(defaults.len(), 1);
    let url = defaults.first().and_then(|e| e.attribute("url"));
    let expected = format!("https://raw.githubusercontent.com/meehl/rusty-pob-manifest/main/{game}/");
    assert_eq!(url, Some(expected.as_str()));
}

#[test]
fn default_source_is_second_child() {
    let (manifest, _) = rewritten(Game::Poe1);
    let names: Vec<&str> = manifest
        .root()
        .children
        .iter()
        .take(2)
        .map(Element::name)
        .collect();
    assert_eq!(names, [VERSION_TAG, SOURCE_TAG]);
    assert_eq!(
        manifest.root().children.get(1),
        Some(&default_source(Game::Poe1))
    );
}

#[test]
fn version_is_pinned_to_master_on_any_platform() {
    let (manifest, _) = rewritten(Game::Poe1);
    let version = children_named(&manifest, VERSION_TAG)
        .next()
        .expect("version element");
    assert_eq!(version.attribute("branch"), Some("master"));
    assert_eq!(version.attribute(PLATFORM), Some("any"));
    assert_eq!(version.attribute("number"), Some("2.55.5"));
}

#[test]
fn sources_lose_platform_and_default_label() {
    let (manifest, summary) = rewritten(Game::Poe1);
    assert!(children_named(&manifest, SOURCE_TAG).all(|e| !e.has_attribute(PLATFORM)));
    assert_eq!(summary.platforms_stripped, 1);

    let upstream_default = children_named(&manifest, SOURCE_TAG)
        .find(|e| e.attribute("url").is_some_and(|u| u.ends_with("/{branch}/")))
        .expect("upstream default source");
    assert_eq!(upstream_default.attribute(PART), Some(PART_ORIGIN));
}

#[test]
fn runtime_font_and_archive_files_are_removed() {
    let (manifest, summary) = rewritten(Game::Poe1);
    for removed in [
        "Bold.tga",
        "Fonts/VeraMono.tgf",
        "TreeData/3_25/tree.tar",
        "Path of Building.exe",
        "lua51.dll",
        "lcurl.dll",
    ] {
        assert!(file_named(&manifest, removed).is_none(), "{removed} kept");
        assert!(summary.removed_files.iter().any(|n| n == removed));
    }
    assert!(children_named(&manifest, FILE_TAG).all(|e| !e.has_attribute("runtime")));
    assert_eq!(summary.removed_files.len(), 6);
}

#[test]
fn default_files_are_relabelled_as_origin() {
    let (manifest, summary) = rewritten(Game::Poe1);
    for name in ["changelog.txt", "help.txt"] {
        let file = file_named(&manifest, name).expect("kept file");
        assert_eq!(file.attribute(PART), Some(PART_ORIGIN));
    }
    // One source plus four files (two of which are later removed).
    assert_eq!(summary.relabelled, 5);
}

#[test]
fn update_script_points_at_local_copy() {
    let (manifest, summary) = rewritten(Game::Poe2);
    let script = file_named(&manifest, UPDATE_SCRIPT_FILENAME).expect("update script");
    assert_eq!(script.attribute(PART), Some(PART_DEFAULT));
    assert_eq!(script.attribute("sha1"), Some(SCRIPT_SHA1));
    assert_eq!(
        summary.script_digest.as_ref().map(Sha1Digest::as_str),
        Some(SCRIPT_SHA1)
    );
}

#[test]
fn unrelated_files_are_untouched() {
    let before = upstream();
    let (after, _) = rewritten(Game::Poe1);
    for name in ["Launch.lua", "Modules/Build.lua"] {
        assert_eq!(file_named(&after, name), file_named(&before, name));
    }
}

#[test]
fn update_script_example_gets_default_part_and_digest() {
    let mut manifest = Manifest::parse(
        br#"<PoBVersion><Version/><File name="UpdateCheck.lua" part="origin"/></PoBVersion>"#,
    )
    .expect("parse");
    rewrite_with(&mut manifest, Game::Poe1, || Ok(Sha1Digest::of_bytes(b"x"))).expect("rewrite");

    let xml = manifest.to_xml().expect("serialize");
    assert!(xml.contains(
        "<File name=\"UpdateCheck.lua\" part=\"default\" sha1=\"11f6ad8ec52a2984abaafd7c3b516503785c2072\"/>"
    ));
}

#[test]
fn default_update_script_is_not_counted_as_relabelled() {
    let mut manifest = Manifest::parse(
        br#"<PoBVersion><Version/><File name="UpdateCheck.lua" part="default"/><File name="help.txt" part="default"/></PoBVersion>"#,
    )
    .expect("parse");
    let summary =
        rewrite_with(&mut manifest, Game::Poe1, || Ok(Sha1Digest::of_bytes(b"x"))).expect("rewrite");

    assert_eq!(summary.relabelled, 1);
    let script = file_named(&manifest, UPDATE_SCRIPT_FILENAME).expect("update script");
    assert_eq!(script.attribute(PART), Some(PART_DEFAULT));
    assert_eq!(script.attribute("sha1"), Some(SCRIPT_SHA1));
}

#[test]
fn script_is_not_read_when_not_listed() {
    let mut manifest =
        Manifest::parse(br#"<PoBVersion><Version/><File name="Launch.lua"/></PoBVersion>"#)
            .expect("parse");
    let summary = rewrite_with(&mut manifest, Game::Poe1, || {
        Err(ManifestError::Parse {
            reason: "script should not be read".to_owned(),
        })
    })
    .expect("rewrite without script");
    assert_eq!(summary.script_digest, None);
}

#[test]
fn script_read_failure_aborts_rewrite() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = camino::Utf8PathBuf::try_from(dir.path().join("UpdateCheck.lua"))
        .expect("utf-8 path");
    let mut manifest = upstream();

    let err = rewrite(&mut manifest, Game::Poe1, &missing).expect_err("missing script");
    assert!(matches!(err, ManifestError::ReadScript { .. }));
}

#[test]
fn file_without_name_is_kept_unless_runtime() {
    let mut manifest = Manifest::parse(
        br#"<PoBVersion><Version/><File part="program"/><File runtime="win32"/></PoBVersion>"#,
    )
    .expect("parse");
    let summary =
        rewrite_with(&mut manifest, Game::Poe1, || Ok(Sha1Digest::of_bytes(b""))).expect("rewrite");

    assert_eq!(children_named(&manifest, FILE_TAG).count(), 1);
    assert_eq!(summary.removed_files, [""]);
}

#[test]
fn default_source_becomes_only_child_of_empty_root() {
    let mut manifest = Manifest::parse(b"<PoBVersion/>").expect("parse");
    rewrite_with(&mut manifest, Game::Poe2, || Ok(Sha1Digest::of_bytes(b""))).expect("rewrite");
    assert_eq!(manifest.root().children, [default_source(Game::Poe2)]);
}

#[test]
fn unknown_elements_pass_through() {
    let mut manifest =
        Manifest::parse(br#"<PoBVersion><Version/><Notes part="default"/></PoBVersion>"#)
            .expect("parse");
    rewrite_with(&mut manifest, Game::Poe1, || Ok(Sha1Digest::of_bytes(b""))).expect("rewrite");
    let notes = manifest.root().children.last().expect("notes element");
    assert_eq!(notes.attribute(PART), Some(PART_DEFAULT));
}

#[rstest]
#[case::tga("Bold.tga", true, false)]
#[case::tgf("Fonts/VeraMono.tgf", true, true)]
#[case::tar("tree.tar", false, true)]
#[case::lua("Launch.lua", false, false)]
#[case::tar_gz("tree.tar.gz", false, false)]
fn asset_predicates(#[case] name: &str, #[case] font: bool, #[case] archive: bool) {
    assert_eq!(is_font_asset(name), font);
    assert_eq!(is_archive_asset(name), archive);
}

#[test]
fn summary_mentions_counts_and_digest() {
    let (_, summary) = rewritten(Game::Poe1);
    let text = summary.to_string();
    assert!(text.contains("removed 6 files"));
    assert!(text.contains(SCRIPT_SHA1));
}
