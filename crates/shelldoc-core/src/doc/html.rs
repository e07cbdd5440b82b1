//! HTML page renderer

use std::fmt::Write;

use super::types::{DocumentationNode, NodeKind, PageIndexEntry, Tag};

/// File name of the shared stylesheet in the output directory
pub const STYLESHEET_FILE: &str = "style.css";

/// Built-in stylesheet, copied next to the pages
pub const STYLESHEET: &str = include_str!("../../assets/style.css");

/// File name of the index page in the output directory
pub const INDEX_FILE: &str = "index.html";

/// Renders documentation trees as HTML pages
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    title: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new("Documentation")
    }
}

impl HtmlRenderer {
    /// Create a renderer; `title` names the documentation set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Render the page for one module
    pub fn render_page(&self, module: &DocumentationNode) -> String {
        let mut output = String::new();
        let classes = class_sections(module);
        let members: Vec<_> = module.members().collect();

        self.write_head(&mut output, &module.name);
        writeln!(output, "<body>").unwrap();

        // Navigation sidebar
        writeln!(output, "<nav class=\"sidebar\">").unwrap();
        writeln!(output, "  <div class=\"sidebar-header\">").unwrap();
        writeln!(output, "    <h2>{}</h2>", escape_html(&module.name)).unwrap();
        writeln!(output, "    <a class=\"back\" href=\"{INDEX_FILE}\">{}</a>", escape_html(&self.title))
            .unwrap();
        writeln!(output, "  </div>").unwrap();
        write_nav(&mut output, &classes, &members);
        writeln!(output, "</nav>").unwrap();

        writeln!(output, "<main class=\"content\">").unwrap();
        writeln!(output, "<header>").unwrap();
        writeln!(output, "  <h1>{}</h1>", escape_html(&module.name)).unwrap();
        writeln!(output, "</header>").unwrap();

        if !module.summary.is_empty() || !module.tags.is_empty() {
            writeln!(output, "<section class=\"module-doc\">").unwrap();
            write_paragraphs(&mut output, &module.summary, "  ");
            write_notes(&mut output, &module.tags, "  ");
            writeln!(output, "</section>").unwrap();
        }

        if !members.is_empty() {
            writeln!(output, "<section id=\"module-members\">").unwrap();
            writeln!(output, "  <h2>Module members</h2>").unwrap();
            write_member_table(&mut output, "module", &members);
            writeln!(output, "</section>").unwrap();
        }

        for (path, class) in &classes {
            write_class(&mut output, path, class);
        }

        writeln!(output, "</main>").unwrap();
        write_footer(&mut output);
        writeln!(output, "</body>").unwrap();
        writeln!(output, "</html>").unwrap();

        output
    }

    /// Render the index page linking every documented module
    pub fn render_index(&self, entries: &[PageIndexEntry]) -> String {
        let mut output = String::new();

        self.write_head(&mut output, "Index");
        writeln!(output, "<body class=\"index\">").unwrap();
        writeln!(output, "<main class=\"content\">").unwrap();
        writeln!(output, "<header>").unwrap();
        writeln!(output, "  <h1>{}</h1>", escape_html(&self.title)).unwrap();
        writeln!(output, "</header>").unwrap();

        writeln!(output, "<section id=\"modules\">").unwrap();
        writeln!(output, "  <h2>Modules</h2>").unwrap();
        if entries.is_empty() {
            writeln!(output, "  <p class=\"empty\">No documented files.</p>").unwrap();
        } else {
            writeln!(output, "  <ul class=\"module-list\">").unwrap();
            for entry in entries {
                writeln!(
                    output,
                    "    <li><a href=\"{}\">{}</a></li>",
                    escape_html(&entry.output_file),
                    escape_html(&entry.display_name)
                )
                .unwrap();
            }
            writeln!(output, "  </ul>").unwrap();
        }
        writeln!(output, "</section>").unwrap();

        writeln!(output, "</main>").unwrap();
        write_footer(&mut output);
        writeln!(output, "</body>").unwrap();
        writeln!(output, "</html>").unwrap();

        output
    }

    fn write_head(&self, output: &mut String, page: &str) {
        writeln!(output, "<!DOCTYPE html>").unwrap();
        writeln!(output, "<html lang=\"en\">").unwrap();
        writeln!(output, "<head>").unwrap();
        writeln!(output, "  <meta charset=\"UTF-8\">").unwrap();
        writeln!(
            output,
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )
        .unwrap();
        writeln!(
            output,
            "  <title>{} - {}</title>",
            escape_html(page),
            escape_html(&self.title)
        )
        .unwrap();
        writeln!(output, "  <link rel=\"stylesheet\" href=\"{STYLESHEET_FILE}\">").unwrap();
        writeln!(output, "</head>").unwrap();
    }
}

/// Classes in page order with their dotted paths (`Outer.Inner`)
fn class_sections(module: &DocumentationNode) -> Vec<(String, &DocumentationNode)> {
    let mut sections = Vec::new();
    let mut stack: Vec<(String, &DocumentationNode)> = module
        .classes()
        .rev()
        .map(|c| (c.name.clone(), c))
        .collect();
    while let Some((path, class)) = stack.pop() {
        for inner in class.classes().rev() {
            stack.push((format!("{path}.{}", inner.name), inner));
        }
        sections.push((path, class));
    }
    sections
}

fn write_nav(output: &mut String, classes: &[(String, &DocumentationNode)], members: &[&DocumentationNode]) {
    writeln!(output, "  <nav>").unwrap();

    if !members.is_empty() {
        writeln!(output, "    <h3>Module members</h3>").unwrap();
        writeln!(output, "    <ul>").unwrap();
        for member in members {
            writeln!(
                output,
                "      <li><a href=\"#{}\">{}</a></li>",
                member_anchor("module", &member.name),
                escape_html(&member.name)
            )
            .unwrap();
        }
        writeln!(output, "    </ul>").unwrap();
    }

    if !classes.is_empty() {
        writeln!(output, "    <h3>Classes</h3>").unwrap();
        writeln!(output, "    <ul>").unwrap();
        for (path, _) in classes {
            writeln!(
                output,
                "      <li><a href=\"#{}\">{}</a></li>",
                make_anchor(path),
                escape_html(path)
            )
            .unwrap();
        }
        writeln!(output, "    </ul>").unwrap();
    }

    writeln!(output, "  </nav>").unwrap();
}

fn write_class(output: &mut String, path: &str, class: &DocumentationNode) {
    writeln!(output, "<section class=\"class\" id=\"{}\">", make_anchor(path)).unwrap();
    writeln!(output, "  <h2>class <code>{}</code></h2>", escape_html(path)).unwrap();
    write_paragraphs(output, &class.summary, "  ");
    write_notes(output, &class.tags, "  ");

    if !class.parameters.is_empty() {
        writeln!(output, "  <div class=\"params\">").unwrap();
        writeln!(output, "    <h4>Parameters</h4>").unwrap();
        write_params_table(output, class, "    ");
        writeln!(output, "  </div>").unwrap();
    }

    let members: Vec<_> = class.members().collect();
    if !members.is_empty() {
        write_member_table(output, path, &members);
    }
    writeln!(output, "</section>").unwrap();
}

fn write_member_table(output: &mut String, owner: &str, members: &[&DocumentationNode]) {
    writeln!(output, "  <table class=\"members\">").unwrap();
    writeln!(output, "    <thead>").unwrap();
    writeln!(output, "      <tr><th>Name</th><th>Signature</th><th>Description</th></tr>").unwrap();
    writeln!(output, "    </thead>").unwrap();
    writeln!(output, "    <tbody>").unwrap();
    for member in members {
        write_member_row(output, owner, member);
    }
    writeln!(output, "    </tbody>").unwrap();
    writeln!(output, "  </table>").unwrap();
}

fn write_member_row(output: &mut String, owner: &str, member: &DocumentationNode) {
    let kind_class = match member.kind {
        NodeKind::Method => "method",
        _ => "property",
    };
    writeln!(
        output,
        "      <tr class=\"{kind_class}\" id=\"{}\">",
        member_anchor(owner, &member.name)
    )
    .unwrap();
    writeln!(output, "        <td class=\"name\"><code>{}</code></td>", escape_html(&member.name))
        .unwrap();
    writeln!(
        output,
        "        <td class=\"signature\"><code>{}</code></td>",
        escape_html(&member.signature())
    )
    .unwrap();
    writeln!(output, "        <td class=\"description\">").unwrap();
    write_paragraphs(output, &member.summary, "          ");

    if let Some(ty) = &member.type_hint {
        writeln!(
            output,
            "          <p class=\"type\">Type: <code>{}</code></p>",
            escape_html(ty)
        )
        .unwrap();
    }

    if !member.parameters.is_empty() || member.returns.is_some() {
        write_params_table(output, member, "          ");
    }
    write_notes(output, &member.tags, "          ");

    writeln!(output, "        </td>").unwrap();
    writeln!(output, "      </tr>").unwrap();
}

/// Parameters table with the returns row last
fn write_params_table(output: &mut String, node: &DocumentationNode, indent: &str) {
    writeln!(output, "{indent}<table class=\"params\">").unwrap();
    writeln!(output, "{indent}  <tr><th>Parameter</th><th>Type</th><th>Description</th></tr>")
        .unwrap();
    for param in &node.parameters {
        writeln!(
            output,
            "{indent}  <tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
            escape_html(&param.name),
            type_cell(param.type_hint.as_deref()),
            escape_html(&param.description)
        )
        .unwrap();
    }
    if let Some(returns) = &node.returns {
        writeln!(
            output,
            "{indent}  <tr class=\"returns\"><td>Returns</td><td>{}</td><td>{}</td></tr>",
            type_cell(returns.type_hint.as_deref()),
            escape_html(&returns.description)
        )
        .unwrap();
    }
    writeln!(output, "{indent}</table>").unwrap();
}

fn type_cell(type_hint: Option<&str>) -> String {
    type_hint
        .map(|ty| format!("<code>{}</code>", escape_html(ty)))
        .unwrap_or_default()
}

fn write_paragraphs(output: &mut String, text: &str, indent: &str) {
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        writeln!(output, "{indent}<p class=\"summary\">{}</p>", escape_html(paragraph)).unwrap();
    }
}

/// Extra tags (`@deprecated`, `@since`, ...) as a definition list
fn write_notes(output: &mut String, tags: &[Tag], indent: &str) {
    if tags.is_empty() {
        return;
    }
    writeln!(output, "{indent}<dl class=\"notes\">").unwrap();
    for tag in tags {
        writeln!(
            output,
            "{indent}  <dt class=\"{}\">{}</dt><dd>{}</dd>",
            make_anchor(&tag.name),
            escape_html(&tag.name),
            escape_html(&tag.value)
        )
        .unwrap();
    }
    writeln!(output, "{indent}</dl>").unwrap();
}

fn write_footer(output: &mut String) {
    writeln!(output, "<footer>").unwrap();
    writeln!(output, "  <p>Generated by shelldoc {}</p>", crate::VERSION).unwrap();
    writeln!(output, "</footer>").unwrap();
}

/// Anchor for a member row, unique across owners
fn member_anchor(owner: &str, member: &str) -> String {
    format!("{}-{}", make_anchor(owner), make_anchor(member))
}

fn make_anchor(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}

/// Escape text for HTML content and attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Extractor, Parameter, Returns};

    fn render(source: &str) -> String {
        let module = Extractor::extract(source, "greeting").unwrap_or_else(|e| panic!("{e}"));
        HtmlRenderer::new("Shell JS").render_page(&module)
    }

    #[test]
    fn test_render_page() {
        let html = render(
            r"
/** A simple greeter. */
class Greeter {
    /**
     * Greets someone.
     * @param name who to greet
     */
    greet(name: string) -> string {
        return `Hello, ${name}!`;
    }
}
",
        );

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>greeting - Shell JS</title>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"style.css\">"));
        assert!(!html.contains("<style>"));
        assert!(html.contains("<section class=\"class\" id=\"greeter\">"));
        assert!(html.contains("A simple greeter."));
        assert!(html.contains("id=\"greeter-greet\""));
        assert!(html.contains("greet(name: string) -&gt; string"));
        assert!(html.contains("<td><code>name</code></td><td><code>string</code></td><td>who to greet</td>"));
        assert!(html.contains("<tr class=\"returns\"><td>Returns</td><td><code>string</code></td>"));
    }

    #[test]
    fn module_members_get_their_own_section() {
        let html = render("/** Max items. */\nconst MAX = 5;\nfunction helper() {}\n");
        assert!(html.contains("<section id=\"module-members\">"));
        assert!(html.contains("id=\"module-max\""));
        assert!(html.contains("id=\"module-helper\""));
        assert!(html.contains("<a href=\"#module-max\">MAX</a>"));
    }

    #[test]
    fn nested_classes_use_dotted_paths() {
        let mut module = DocumentationNode::module("m");
        let mut outer = DocumentationNode::new(NodeKind::Class, "Outer");
        outer.add_child(DocumentationNode::new(NodeKind::Class, "Inner"));
        module.add_child(outer);
        let html = HtmlRenderer::default().render_page(&module);
        assert!(html.contains("<a href=\"#outer-inner\">Outer.Inner</a>"));
        assert!(html.contains("class <code>Outer.Inner</code>"));
    }

    #[test]
    fn class_sections_follow_source_order() {
        let mut module = DocumentationNode::module("m");
        let mut first = DocumentationNode::new(NodeKind::Class, "First");
        first.add_child(DocumentationNode::new(NodeKind::Class, "Nested"));
        module.add_child(first);
        module.add_child(DocumentationNode::new(NodeKind::Property, "x"));
        module.add_child(DocumentationNode::new(NodeKind::Class, "Second"));

        let paths: Vec<_> = class_sections(&module).into_iter().map(|(path, _)| path).collect();
        assert_eq!(paths, ["First", "First.Nested", "Second"]);
    }

    #[test]
    fn text_is_escaped() {
        let mut module = DocumentationNode::module("m").with_summary("<script>alert('x')</script>");
        let mut method = DocumentationNode::new(NodeKind::Method, "f");
        method.parameters.push(
            Parameter::new("a")
                .with_type("Array<int>")
                .with_description("\"quoted\" & more"),
        );
        method.returns = Some(Returns {
            type_hint: None,
            description: "a < b".to_string(),
        });
        module.add_child(method);

        let html = HtmlRenderer::default().render_page(&module);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Array&lt;int&gt;"));
        assert!(html.contains("&quot;quoted&quot; &amp; more"));
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn summary_paragraphs() {
        let module = DocumentationNode::module("m").with_summary("First.\n\nSecond.");
        let html = HtmlRenderer::default().render_page(&module);
        assert!(html.contains("<p class=\"summary\">First.</p>"));
        assert!(html.contains("<p class=\"summary\">Second.</p>"));
    }

    #[test]
    fn tags_render_as_notes() {
        let mut module = DocumentationNode::module("m");
        let mut class = DocumentationNode::new(NodeKind::Class, "Old");
        class.tags.push(Tag {
            name: "deprecated".to_string(),
            value: "use New".to_string(),
        });
        module.add_child(class);
        let html = HtmlRenderer::default().render_page(&module);
        assert!(html.contains("<dt class=\"deprecated\">deprecated</dt><dd>use New</dd>"));
    }

    #[test]
    fn index_lists_entries_in_order() {
        let entries = vec![
            PageIndexEntry {
                display_name: "applet".to_string(),
                output_file: "applet.html".to_string(),
            },
            PageIndexEntry {
                display_name: "panel".to_string(),
                output_file: "panel.html".to_string(),
            },
        ];
        let html = HtmlRenderer::new("Cinnamon JS").render_index(&entries);
        assert!(html.contains("<h1>Cinnamon JS</h1>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"style.css\">"));
        let applet = html.find("<a href=\"applet.html\">applet</a>");
        let panel = html.find("<a href=\"panel.html\">panel</a>");
        assert!(applet.is_some() && panel.is_some());
        assert!(applet < panel);
    }

    #[test]
    fn empty_index() {
        let html = HtmlRenderer::default().render_index(&[]);
        assert!(html.contains("No documented files."));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn anchors() {
        assert_eq!(make_anchor("PopupMenu.open"), "popupmenu-open");
        assert_eq!(member_anchor("Foo", "#bar"), "foo--bar");
    }
}
