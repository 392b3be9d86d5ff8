use indexmap::IndexMap;
use serde::Serialize;

/// Height of the loading container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Dimension {
    /// Full viewport height
    Viewport,
    /// Pixels
    Px(u32),
    /// Any CSS length, used verbatim
    Css(String),
}

impl Dimension {
    pub fn to_css(&self) -> String {
        match self {
            Dimension::Viewport => "100vh".to_string(),
            Dimension::Px(px) => format!("{}px", px),
            Dimension::Css(value) => value.clone(),
        }
    }
}

/// Display options for the loading indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingProps {
    pub text: String,
    /// Spinner diameter in pixels
    pub size: u32,
    pub full_page: bool,
    /// Container height when not full page; 200px when unset
    pub height: Option<Dimension>,
}

pub const DEFAULT_TEXT: &str = "Loading...";
pub const DEFAULT_SPINNER_SIZE: u32 = 40;
pub const DEFAULT_HEIGHT_PX: u32 = 200;

impl Default for LoadingProps {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            size: DEFAULT_SPINNER_SIZE,
            full_page: false,
            height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    pub class: &'static str,
    pub style: IndexMap<&'static str, String>,
    pub children: Vec<Node>,
}

impl Element {
    fn new(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag,
            class,
            style: IndexMap::new(),
            children: Vec::new(),
        }
    }

    fn with_style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.insert(property, value.into());
        self
    }

    fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        self.children
            .iter()
            .map(|child| match child {
                Node::Element(element) => element.text(),
                Node::Text(text) => text.clone(),
            })
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if !self.class.is_empty() {
            out.push_str(" class=\"");
            out.push_str(self.class);
            out.push('"');
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            out.push_str(" style=\"");
            out.push_str(&escape(&style.join("; ")));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_html(out),
                Node::Text(text) => out.push_str(&escape(text)),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the loading indicator: a centered column with a spinner and label.
pub fn render(props: &LoadingProps) -> Element {
    let height = if props.full_page {
        Dimension::Viewport
    } else {
        props
            .height
            .clone()
            .unwrap_or(Dimension::Px(DEFAULT_HEIGHT_PX))
    };

    let spinner_size = format!("{}px", props.size);
    let spinner = Element::new("div", "loading-spinner")
        .with_style("width", spinner_size.clone())
        .with_style("height", spinner_size)
        .with_style("border-radius", "50%");

    let label = Element::new("p", "loading-text")
        .with_style("margin-top", "16px")
        .with_child(Node::Text(props.text.clone()));

    let mut container = Element::new("div", "loading-container")
        .with_style("display", "flex")
        .with_style("flex-direction", "column")
        .with_style("align-items", "center")
        .with_style("justify-content", "center")
        .with_style("height", height.to_css());

    if props.full_page {
        container = container.with_style("width", "100%");
    }

    container
        .with_child(Node::Element(spinner))
        .with_child(Node::Element(label))
}
