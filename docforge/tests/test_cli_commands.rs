mod common;

use common::{DocforgeProcess, exit_code, read};

const UPPERCASE: &str = "tr a-z A-Z";

// ============================================================================
// version / completions / usage
// ============================================================================

#[test]
fn version_human() {
    let output = DocforgeProcess::spawn_command(&["version"]);
    assert!(
        output.status.success(),
        "version should exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("docforge "), "unexpected output: {stdout}");
}

#[test]
fn version_json() {
    let output = DocforgeProcess::spawn_command(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version JSON should be valid");
    assert_eq!(parsed["name"], "docforge");
    assert!(parsed["version"].is_string());
}

#[test]
fn completions_bash() {
    let output = DocforgeProcess::spawn_command(&["completions", "bash"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("docforge"), "bash completions should reference docforge");
    assert!(stdout.contains("build-cookbooks"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = DocforgeProcess::spawn_command(&["publish"]);
    assert_eq!(exit_code(&output), 64);
}

#[test]
fn help_exits_zero() {
    let output = DocforgeProcess::spawn_command(&["--help"]);
    assert_eq!(exit_code(&output), 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("check-frontmatter"));
}

// ============================================================================
// format
// ============================================================================

#[test]
fn format_rewrites_python_blocks() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output = DocforgeProcess::spawn_in(dir.path(), &["format", ".", "--formatter", UPPERCASE]);
    assert!(
        output.status.success(),
        "format should exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let chat = read(&dir.path().join("guides/chat.mdx"));
    assert!(
        chat.contains("```python\n!pip install cohere\nIMPORT COHERE\nCO = COHERE.CLIENTV2()\n```"),
        "python block should be reformatted with magic line intact:\n{chat}"
    );
    assert!(chat.contains("```bash\npip install cohere\n```"));
    assert!(chat.starts_with("---\ntitle: Using the Chat API for Conversations\n"));

    let embeddings = read(&dir.path().join("guides/embeddings.mdx"));
    assert!(embeddings.contains("```python\n%time\nVECTORS = CO.EMBED(TEXTS=[\"HELLO\"])\n```"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("6 file(s) scanned, 5 changed"), "summary missing: {stderr}");
}

#[test]
fn format_default_visits_every_folder() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output = DocforgeProcess::spawn_in(dir.path(), &["format", ".", "--formatter", UPPERCASE]);
    assert!(output.status.success());

    assert!(read(&dir.path().join("llm-university/intro.mdx")).contains("RESPONSE = CO.CHAT("));
    assert!(read(&dir.path().join("api-reference/chat.mdx")).contains("CO.CHAT()"));
    assert!(read(&dir.path().join("-ARCHIVE-/old.mdx")).contains("PRINT(\"ARCHIVED\")"));
}

#[test]
fn format_skips_excluded_directories() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let before_api = read(&dir.path().join("api-reference/chat.mdx"));
    let before_guide = read(&dir.path().join("guides/chat.mdx"));

    let output = DocforgeProcess::spawn_in(
        dir.path(),
        &["format", ".", "--formatter", UPPERCASE, "--exclude", "guides", "--exclude", "api-*"],
    );
    assert!(output.status.success());

    assert_eq!(read(&dir.path().join("api-reference/chat.mdx")), before_api);
    assert_eq!(read(&dir.path().join("guides/chat.mdx")), before_guide);
    assert!(read(&dir.path().join("llm-university/intro.mdx")).contains("RESPONSE"));
}

#[test]
fn format_config_exclusions_apply() {
    let dir = DocforgeProcess::scratch_copy("pages");
    std::fs::write(
        dir.path().join("docforge.yaml"),
        "pages_dir: .\nformatter:\n  exclude: [llm-university]\n",
    )
    .unwrap();
    let before = read(&dir.path().join("llm-university/intro.mdx"));

    let output = DocforgeProcess::spawn_in(dir.path(), &["format", "--formatter", UPPERCASE]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(read(&dir.path().join("llm-university/intro.mdx")), before);
    assert!(read(&dir.path().join("guides/chat.mdx")).contains("IMPORT COHERE"));
}

#[test]
fn format_second_run_changes_nothing() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let args = ["format", ".", "--formatter", UPPERCASE, "--check"];

    let first = DocforgeProcess::spawn_in(dir.path(), &args);
    assert_eq!(exit_code(&first), 4, "first run changes files");
    let after_first = read(&dir.path().join("guides/chat.mdx"));

    let second = DocforgeProcess::spawn_in(dir.path(), &args);
    assert_eq!(
        exit_code(&second),
        0,
        "second run should be clean: {}",
        String::from_utf8_lossy(&second.stderr)
    );
    assert_eq!(read(&dir.path().join("guides/chat.mdx")), after_first);
}

#[test]
fn format_check_mode_from_ci_env() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output = DocforgeProcess::spawn_with_env(
        dir.path(),
        &["format", ".", "--formatter", UPPERCASE],
        &[("CI", "true")],
    );
    assert_eq!(exit_code(&output), 4);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chat.mdx"), "changed files should be listed: {stderr}");
    // Files are still rewritten so the diff can be inspected.
    assert!(read(&dir.path().join("guides/chat.mdx")).contains("IMPORT COHERE"));
}

#[test]
fn format_failing_formatter_leaves_blocks() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let before = read(&dir.path().join("guides/chat.mdx"));

    let output = DocforgeProcess::spawn_in(
        dir.path(),
        &["format", ".", "--formatter", "sh -c 'echo cannot parse >&2; exit 123'"],
    );
    assert!(
        output.status.success(),
        "block failures are reported, not fatal: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(read(&dir.path().join("guides/chat.mdx")), before);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot parse"), "failure reason missing: {stderr}");
    assert!(stderr.contains("5 block(s) failed"), "summary missing: {stderr}");
}

#[test]
fn format_missing_formatter_aborts() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output = DocforgeProcess::spawn_in(
        dir.path(),
        &["format", ".", "--formatter", "docforge-test-no-such-formatter -"],
    );
    assert_eq!(exit_code(&output), 5);
}

#[test]
fn format_single_file() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output = DocforgeProcess::spawn_in(
        dir.path(),
        &["format", "guides/embeddings.mdx", "--formatter", UPPERCASE],
    );
    assert!(output.status.success());
    assert!(read(&dir.path().join("guides/embeddings.mdx")).contains("VECTORS"));
    assert!(!read(&dir.path().join("guides/chat.mdx")).contains("IMPORT COHERE"));
}

#[test]
fn format_missing_path_is_usage_error() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output = DocforgeProcess::spawn_in(dir.path(), &["format", "does-not-exist"]);
    assert_eq!(exit_code(&output), 64);
}

// ============================================================================
// check-frontmatter
// ============================================================================

#[test]
fn check_frontmatter_reports_invalid_pages() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output = DocforgeProcess::spawn_in(dir.path(), &["check-frontmatter", "."]);
    assert_eq!(exit_code(&output), 4);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("guides/embeddings.mdx: missing a description"), "{stderr}");
    assert!(stderr.contains("3 page(s) checked, 2 valid, 1 invalid"), "{stderr}");
}

#[test]
fn check_frontmatter_json() {
    let dir = DocforgeProcess::scratch_copy("pages");
    let output =
        DocforgeProcess::spawn_in(dir.path(), &["check-frontmatter", ".", "--format", "json"]);
    assert_eq!(exit_code(&output), 4);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    assert_eq!(parsed["checked"], 3);
    assert_eq!(parsed["invalid"][0]["path"], "guides/embeddings.mdx");
    assert_eq!(parsed["invalid"][0]["warnings"].as_array().map(Vec::len), Some(1));
}

#[test]
fn check_frontmatter_clean_tree_passes() {
    let dir = DocforgeProcess::scratch_copy("pages");
    std::fs::remove_file(dir.path().join("guides/embeddings.mdx")).unwrap();
    let output = DocforgeProcess::spawn_in(dir.path(), &["check-frontmatter", "."]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// ============================================================================
// build-cookbooks
// ============================================================================

#[test]
fn build_cookbooks_writes_pages() {
    let dir = DocforgeProcess::scratch_copy("cookbook");
    let output = DocforgeProcess::spawn_in(dir.path(), &["build-cookbooks"]);
    assert!(
        output.status.success(),
        "build-cookbooks should exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let page = read(&dir.path().join("pages/cookbooks/basic-rag.mdx"));
    assert!(page.starts_with("---\ntitle: Basic RAG with the Chat API\nslug: /page/basic-rag\n"));
    assert!(page.contains("keywords: rag, chat\n"));
    assert!(!page.contains("# Basic RAG\n"));
    assert!(page.contains("Retrieve, then generate."));
    assert!(page.contains("```python\n!pip install cohere\nprint(\"ready\")\n```"));
    assert!(page.contains("    ready"));
    assert!(page.contains("<img src=\"data:image/png;base64,aGVsbG8=\" alt=\"png\"/>"));
    assert!(page.contains(
        "<CookbookHeader href=\"https://github.com/example/notebooks/blob/main/notebooks/Basic_RAG.ipynb\"/>"
    ));
    assert!(!dir.path().join("pages/cookbooks/unfinished.mdx").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jnae@example.com"), "unknown author warning missing: {stderr}");
    assert!(stderr.contains("did you mean 'jane@example.com'"), "{stderr}");
}

#[test]
fn build_cookbooks_check_detects_stale_pages() {
    let dir = DocforgeProcess::scratch_copy("cookbook");
    assert!(DocforgeProcess::spawn_in(dir.path(), &["build-cookbooks"]).status.success());

    let clean = DocforgeProcess::spawn_in(dir.path(), &["build-cookbooks", "--check"]);
    assert_eq!(exit_code(&clean), 0, "{}", String::from_utf8_lossy(&clean.stderr));

    let registry = dir.path().join("scripts/registry.yaml");
    let updated = read(&registry).replace("Basic RAG with the Chat API", "Basic RAG, Revised Edition");
    std::fs::write(&registry, updated).unwrap();
    let page_before = read(&dir.path().join("pages/cookbooks/basic-rag.mdx"));

    let stale = DocforgeProcess::spawn_in(dir.path(), &["build-cookbooks", "--check"]);
    assert_eq!(exit_code(&stale), 4);
    assert_eq!(read(&dir.path().join("pages/cookbooks/basic-rag.mdx")), page_before);
}

#[test]
fn build_cookbooks_only_unknown_slug() {
    let dir = DocforgeProcess::scratch_copy("cookbook");
    let output = DocforgeProcess::spawn_in(dir.path(), &["build-cookbooks", "--only", "basic-rga"]);
    assert_eq!(exit_code(&output), 64);
    assert!(String::from_utf8_lossy(&output.stderr).contains("did you mean 'basic-rag'"));
}

#[test]
fn build_cookbooks_lists_all_missing_notebooks() {
    let dir = DocforgeProcess::scratch_copy("cookbook");
    let registry = dir.path().join("scripts/registry.yaml");
    let extra = "- path: notebooks/Gone.ipynb\n  slug: gone\n- path: notebooks/Lost.ipynb\n  slug: lost\n";
    std::fs::write(&registry, read(&registry) + extra).unwrap();

    let output = DocforgeProcess::spawn_in(dir.path(), &["build-cookbooks"]);
    assert_eq!(exit_code(&output), 3);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("2 registered notebook(s) not found: notebooks/Gone.ipynb, notebooks/Lost.ipynb"),
        "{stderr}"
    );
    assert!(!dir.path().join("pages/cookbooks/basic-rag.mdx").exists());
}

#[test]
fn build_cookbooks_expands_env_in_config() {
    let dir = DocforgeProcess::scratch_copy("cookbook");
    let output = DocforgeProcess::spawn_with_env(
        dir.path(),
        &["build-cookbooks", "--quiet"],
        &[("DOCFORGE_TEST_SOURCE_URL", "https://mirror.example.org/nb")],
    );
    assert!(output.status.success());
    let page = read(&dir.path().join("pages/cookbooks/basic-rag.mdx"));
    assert!(page.contains("href=\"https://mirror.example.org/nb/notebooks/Basic_RAG.ipynb\""));
}

// ============================================================================
// configuration errors
// ============================================================================

#[test]
fn invalid_config_exits_with_config_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("docforge.yaml"), "formatter:\n  line_length: 0\n").unwrap();
    let output = DocforgeProcess::spawn_in(dir.path(), &["check-frontmatter"]);
    assert_eq!(exit_code(&output), 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("formatter.line_length"));
}

#[test]
fn explicit_missing_config_exits_with_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let output =
        DocforgeProcess::spawn_in(dir.path(), &["format", "--config", "missing.yaml"]);
    assert_eq!(exit_code(&output), 2);
}
