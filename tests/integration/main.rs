//! Integration tests for Doxytree
//!
//! These tests load a small Doxygen XML tree from disk, finalize it and render it,
//! both through the library crates and through the CLI binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use doxytree_core::{Config, MarkdownPrinter, node_data};
use doxytree_loader::Index;
use doxytree_render::Renderer;
use tempfile::TempDir;

const MANIFEST: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygenindex version="1.9.8">
  <compound refid="classui_1_1Button" kind="class"><name>ui::Button</name>
    <member refid="classui_1_1Button_1press" kind="function"><name>press</name></member>
  </compound>
  <compound refid="namespaceui" kind="namespace"><name>ui</name></compound>
  <compound refid="group__widgets" kind="group"><name>widgets</name></compound>
  <compound refid="button_8h" kind="file"><name>button.h</name></compound>
  <compound kind="class"><name>Orphan</name></compound>
</doxygenindex>
"#;

const BUTTON: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8">
  <compounddef id="classui_1_1Button" kind="class">
    <compoundname>ui::Button</compoundname>
    <briefdescription><para>A clickable button.</para></briefdescription>
    <detaileddescription><para>Lives in <ref refid="namespaceui" kindref="compound">ui</ref>.</para></detaileddescription>
    <sectiondef kind="public-func">
      <memberdef kind="function" id="classui_1_1Button_1press">
        <type>void</type>
        <definition>void ui::Button::press</definition>
        <argsstring>()</argsstring>
        <name>press</name>
        <briefdescription><para>Press it <bold>once</bold>.</para></briefdescription>
        <location file="include/button.h" line="14"/>
      </memberdef>
    </sectiondef>
    <location file="include/button.h" line="8"/>
  </compounddef>
</doxygen>
"#;

const NAMESPACE: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8">
  <compounddef id="namespaceui" kind="namespace">
    <compoundname>ui</compoundname>
    <innerclass refid="classui_1_1Button">ui::Button</innerclass>
    <briefdescription><para>User interface.</para></briefdescription>
  </compounddef>
</doxygen>
"#;

const GROUP: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8">
  <compounddef id="group__widgets" kind="group">
    <compoundname>widgets</compoundname>
    <title>Widgets</title>
    <innernamespace refid="namespaceui">ui</innernamespace>
    <briefdescription><para>Everything on screen.</para></briefdescription>
  </compounddef>
</doxygen>
"#;

const FILE: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8">
  <compounddef id="button_8h" kind="file">
    <compoundname>button.h</compoundname>
    <innerclass refid="classui_1_1Button">ui::Button</innerclass>
    <briefdescription><para>See <ref refid="classui_1_1Missing" kindref="compound">Missing</ref>.</para></briefdescription>
  </compounddef>
</doxygen>
"#;

const CLASS_TEMPLATE: &str = "# {{ title(kind) }} {{ stripNamespace(name) }}\n\
\n\
{{ brief }}\n\
\n\
{{ details }}\n\
\n\
## Functions ({{ countProperty(children, 'kind', 'function') }})\n\
{% for f in queryProperty(children, 'kind', 'function') %}{{ render('member', f) }}\n{% endfor %}";

const MEMBER_TEMPLATE: &str = "* [{{ name }}]({{ url }}): {{ brief }}";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let xml = dir.path().join("xml");
        fs::create_dir(&xml).unwrap();
        fs::write(xml.join("index.xml"), MANIFEST).unwrap();
        fs::write(xml.join("classui_1_1Button.xml"), BUTTON).unwrap();
        fs::write(xml.join("namespaceui.xml"), NAMESPACE).unwrap();
        fs::write(xml.join("group__widgets.xml"), GROUP).unwrap();
        fs::write(xml.join("button_8h.xml"), FILE).unwrap();

        let templates = dir.path().join("templates");
        fs::create_dir(&templates).unwrap();
        fs::write(templates.join("class.tmpl"), CLASS_TEMPLATE).unwrap();
        fs::write(templates.join("member.tmpl"), MEMBER_TEMPLATE).unwrap();

        let config = serde_json::json!({
            "inputDir": xml,
            "outputDir": dir.path().join("docs"),
            "templatesDir": templates,
        });
        fs::write(dir.path().join("doxytree.json"), config.to_string()).unwrap();

        Project { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> Config {
        Config::load(&self.path().join("doxytree.json")).unwrap()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_doxytree"))
            .arg("--config")
            .arg(self.path().join("doxytree.json"))
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to execute doxytree")
    }
}

/// Test the library pipeline: load, finalize, render one page
#[test]
fn test_load_finalize_render() {
    let project = Project::new();
    let config = project.config();

    let mut index = Index::new(&config.input_dir);
    let load = index.load().unwrap();

    assert_eq!(load.failure_count(), 0);
    let tree = index.tree();
    let names: Vec<&str> = tree
        .children(tree.root())
        .iter()
        .map(|&c| tree[c].name.as_str())
        .collect();
    assert_eq!(names, vec!["widgets", "button.h"]);
    assert_eq!(index.cache().len(), 5);

    let finalize = index.finalize(&config, &MarkdownPrinter);
    assert_eq!(finalize.failures.len(), 1);
    assert_eq!(finalize.failures[0].refid.as_deref(), Some("button_8h"));

    let mut renderer = Renderer::new(config.clone());
    renderer
        .load_dir(config.templates_dir.as_deref().unwrap())
        .unwrap();
    let class = index.find_id("classui_1_1Button").unwrap();
    let data = node_data(index.tree(), class, &config);
    let written = renderer
        .render_to_file("class", Path::new("classes/Button.md"), &data)
        .unwrap();

    assert_eq!(written, project.path().join("docs/classes/Button.md"));
    assert_eq!(
        fs::read_to_string(&written).unwrap(),
        "# Class Button\n\
         \n\
         A clickable button.\n\
         \n\
         Lives in [ui](namespaceui.md).\n\
         \n\
         ## Functions (1)\n\
         * [press](classui_1_1Button.md#function-press): Press it **once**.\n"
    );
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_doxytree"))
        .arg("--help")
        .output()
        .expect("Failed to execute doxytree");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Doxygen XML"));
    for command in ["index", "json", "render", "version"] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

#[test]
fn test_cli_index_prints_outline() {
    let project = Project::new();

    let output = project.run(&["index"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("language"));
    assert!(stdout.contains("└── file button.h"), "{stdout}");
    assert!(stdout.contains("group widgets"), "{stdout}");
    assert!(stdout.contains("function press"), "{stdout}");
}

#[test]
fn test_cli_json_strict_mode() {
    let project = Project::new();
    let out = project.path().join("index.json");

    let lenient = project.run(&["json", "-o", out.to_str().unwrap()]);
    assert!(lenient.status.success());
    let data: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(data["children"][0]["heading"], "Widgets");
    assert_eq!(data["children"][0]["children"][0]["children"][0]["name"], "ui::Button");

    let strict = project.run(&["json", "--strict"]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("could not be finalized"));
}

#[test]
fn test_cli_render_node() {
    let project = Project::new();

    let output = project.run(&[
        "render",
        "--template",
        "class",
        "--refid",
        "classui_1_1Button",
        "--out",
        "Button.md",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let page = fs::read_to_string(project.path().join("docs/Button.md")).unwrap();
    assert!(page.starts_with("# Class Button\n"));
    assert!(page.contains("## Functions (1)"));
}

#[test]
fn test_cli_render_unknown_template() {
    let project = Project::new();

    let output = project.run(&["render", "--template", "struct", "--out", "x.md"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Template struct not found"), "{stderr}");
    assert!(!project.path().join("docs/x.md").exists());
}

#[test]
fn test_cli_missing_manifest() {
    let project = Project::new();
    let empty = project.path().join("empty");
    fs::create_dir(&empty).unwrap();

    let output = project.run(&["index", empty.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("manifest not found"));
}
