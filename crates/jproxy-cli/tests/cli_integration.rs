//! End-to-end tests for the `jproxy` binary.

use jproxy_classfile::ClassFileBuilder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn demo_jar(dir: &Path) -> PathBuf {
    let jar = dir.join("demo.jar");
    let mut zip = zip::ZipWriter::new(File::create(&jar).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    let classes = [
        (
            "demo/Sized",
            ClassFileBuilder::interface("demo/Sized").abstract_method("size", "()I"),
        ),
        (
            "demo/Adder",
            ClassFileBuilder::interface("demo/Adder").abstract_method("add", "(II)I"),
        ),
        ("demo/Point", ClassFileBuilder::class("demo/Point")),
    ];
    for (internal, builder) in classes {
        zip.start_file(format!("{internal}.class"), options).unwrap();
        zip.write_all(&builder.build()).unwrap();
    }
    zip.finish().unwrap();
    jar
}

fn jproxy(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jproxy"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("JPROXY_LOG")
        .env_remove("JPROXY_HOST_CLASSPATH")
        .output()
        .expect("failed to run jproxy")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_writes_proxy_and_reports_path() {
    let temp = TempDir::new().unwrap();
    let jar = demo_jar(temp.path());
    let out_dir = temp.path().join("generated");

    let output = jproxy(
        temp.path(),
        &[
            "-c",
            "demo.Sized",
            "-i",
            jar.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "-p",
            "org.generated",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = out_dir.join("ProxySized.java");
    assert_eq!(
        stdout(&output),
        format!("SUCCESS, saved to: {}\n", written.display())
    );
    let body = std::fs::read_to_string(&written).unwrap();
    assert!(body.starts_with("package org.generated;\nimport java.lang.reflect.Method;\n"));
    assert!(body.contains("public class ProxySized implements demo.Sized {"));
    assert!(body.contains("return (java.lang.Integer) result;"));
}

#[test]
fn test_print_skips_the_file() {
    let temp = TempDir::new().unwrap();
    let jar = demo_jar(temp.path());

    let output = jproxy(
        temp.path(),
        &["-c", "demo.Adder", "-i", jar.to_str().unwrap(), "--print", "--primitive-lookup"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("ProxyAdder\nimport java.lang.reflect.Method;\n"));
    assert!(text.contains("getMethod(\"add\", int.class, int.class);"));
    assert!(!temp.path().join("ProxyAdder.java").exists());
}

#[test]
fn test_default_output_dir_is_working_directory() {
    let temp = TempDir::new().unwrap();
    let jar = demo_jar(temp.path());

    let output = jproxy(temp.path(), &["-c", "demo.Sized", "-i", jar.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(temp.path().join("ProxySized.java").is_file());
}

#[test]
fn test_config_file_in_working_directory() {
    let temp = TempDir::new().unwrap();
    let jar = demo_jar(temp.path());
    std::fs::write(
        temp.path().join("jproxy.toml"),
        "[host]\nclasspath = [\"demo.jar\"]\ndiscover = false\n\n[lookup]\nprimitive_keys = \"primitive\"\n",
    )
    .unwrap();
    assert!(jar.is_file());

    let output = jproxy(temp.path(), &["-c", "demo.Adder", "--print"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("getMethod(\"add\", int.class, int.class);"));
}

#[test]
fn test_missing_class_argument_prints_usage() {
    let temp = TempDir::new().unwrap();
    let output = jproxy(temp.path(), &["-o", "out"]);

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("--class <NAME>"));
    assert!(err.contains("Usage:"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_unknown_type_fails() {
    let temp = TempDir::new().unwrap();
    let jar = demo_jar(temp.path());

    let output = jproxy(temp.path(), &["-c", "demo.Missing", "-i", jar.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Type not found: demo.Missing"));
    assert!(!temp.path().join("ProxyMissing.java").exists());
}

#[test]
fn test_class_target_is_rejected() {
    let temp = TempDir::new().unwrap();
    let jar = demo_jar(temp.path());

    let output = jproxy(temp.path(), &["-c", "demo.Point", "-i", jar.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("only interfaces can be proxied"));
}

#[test]
fn test_write_failure_is_logged() {
    let temp = TempDir::new().unwrap();
    let jar = demo_jar(temp.path());
    let blocker = temp.path().join("blocked");
    std::fs::write(&blocker, b"").unwrap();

    let output = jproxy(
        temp.path(),
        &["-c", "demo.Sized", "-i", jar.to_str().unwrap(), "-o", blocker.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to write proxy source"));
    assert!(!stdout(&output).contains("SUCCESS"));
}
