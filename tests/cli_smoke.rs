use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_metaloop")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "metaloop.exe"
            } else {
                "metaloop"
            });
            p
        })
}

#[test]
fn cli_generate_writes_reproducible_json() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let run = |name: &str| {
        let out = dir.join(name);
        let _ = std::fs::remove_file(&out);
        let status = std::process::Command::new(exe())
            .args(["generate", "--seed", "1234", "--fps", "24", "--seconds", "5", "--out"])
            .arg(&out)
            .status()
            .unwrap();
        assert!(status.success());
        std::fs::read_to_string(&out).unwrap()
    };

    let a = run("a.json");
    let b = run("b.json");
    assert_eq!(a, b);

    let v: serde_json::Value = serde_json::from_str(&a).unwrap();
    assert_eq!(v["seed"], 1234);
    assert_eq!(v["total_frames"], 120);
    assert_eq!(v["centerpiece"]["elements"].as_array().unwrap().len(), 10);
}

#[test]
fn cli_batch_writes_numbered_loops() {
    let dir = PathBuf::from("target").join("cli_smoke_batch");
    let _ = std::fs::remove_dir_all(&dir);

    let status = std::process::Command::new(exe())
        .args(["batch", "--seed", "10", "--loops", "3", "--count", "2", "--out-dir"])
        .arg(&dir)
        .status()
        .unwrap();
    assert!(status.success());

    for i in 0..3u64 {
        let s = std::fs::read_to_string(dir.join(format!("loop_{i}.json"))).unwrap();
        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["seed"], 10 + i);
    }
}

#[test]
fn cli_rejects_zero_fps() {
    let status = std::process::Command::new(exe())
        .args(["generate", "--seed", "1", "--fps", "0"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_rejects_oversized_count_without_panicking() {
    let output = std::process::Command::new(exe())
        .args(["generate", "--seed", "1", "--count", "18446744073709551615"])
        .output()
        .unwrap();
    // 101 would mean a panic; a validation error exits with 1.
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("metaball_count"), "stderr: {stderr}");
}

#[test]
fn cli_seed_flag_trims_and_rejects_garbage() {
    let a = std::process::Command::new(exe())
        .args(["generate", "--seed", " 42 ", "--count", "2"])
        .output()
        .unwrap();
    let b = std::process::Command::new(exe())
        .args(["generate", "--seed", "42", "--count", "2"])
        .output()
        .unwrap();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);

    let status = std::process::Command::new(exe())
        .args(["generate", "--seed", "forty-two"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_ops_lists_host_calls() {
    let output = std::process::Command::new(exe())
        .args(["ops", "--seed", "7", "--no-glow"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let ops: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ops = ops.as_array().unwrap();
    assert_eq!(ops[0]["op"], "configure_scene");
    assert!(!ops.iter().any(|op| op["op"] == "add_glare"));
}
