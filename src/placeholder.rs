//! Inline SVG placeholders shown while real images are loading.

use crate::asset::Locator;
use crate::config::{DEFAULT_PLACEHOLDER_HEIGHT, DEFAULT_PLACEHOLDER_WIDTH, PLACEHOLDER_FONT_SIZE_PX};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

/// Builds placeholder data URIs with a random fill colour.
///
/// The random source is injected so tests can use a seeded generator.
#[derive(Clone)]
pub struct PlaceholderGenerator {
    rng: Rc<RefCell<Box<dyn RngCore>>>,
}

impl PlaceholderGenerator {
    pub fn new(rng: impl RngCore + 'static) -> Self {
        Self {
            rng: Rc::new(RefCell::new(Box::new(rng))),
        }
    }

    /// Generator seeded from the operating system (or `crypto.getRandomValues` in the browser).
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Random 24-bit colour as six lowercase hex digits.
    fn next_color(&self) -> String {
        let value: u32 = self.rng.borrow_mut().random_range(0..0xFF_FFFF);
        format!("{:06x}", value)
    }

    /// Placeholder labelled `text`, sized `width` x `height`.
    pub fn generate(&self, text: &str, width: u32, height: u32) -> Locator {
        let color = self.next_color();
        let uri = format!(
            "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}'%3E\
             %3Crect width='100%25' height='100%25' fill='%23{color}'/%3E\
             %3Ctext x='50%25' y='50%25' dominant-baseline='middle' text-anchor='middle' \
             font-family='sans-serif' font-size='{font}px' fill='white'%3E{label}%3C/text%3E%3C/svg%3E",
            w = width,
            h = height,
            color = color,
            font = PLACEHOLDER_FONT_SIZE_PX,
            label = encode_label(text),
        );
        Rc::from(uri)
    }

    /// `count` placeholders labelled "Project 1", "Project 2", ...
    pub fn project_placeholders(&self, count: usize) -> Vec<Locator> {
        (1..=count)
            .map(|i| {
                self.generate(
                    &format!("Project {}", i),
                    DEFAULT_PLACEHOLDER_WIDTH,
                    DEFAULT_PLACEHOLDER_HEIGHT,
                )
            })
            .collect()
    }
}

impl Default for PlaceholderGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Escape XML markup, then percent-encode what a data URI cannot carry raw.
fn encode_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '\n' => out.push_str("%0A"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_svg_data_uri_with_label_and_size() {
        let gen = PlaceholderGenerator::seeded(7);
        let uri = gen.generate("Loading: profile.jpg", 320, 200);
        assert!(uri.starts_with("data:image/svg+xml,%3Csvg"));
        assert!(uri.contains("width='320' height='200'"));
        assert!(uri.contains("%3ELoading: profile.jpg%3C/text%3E"));
        assert!(uri.ends_with("%3C/svg%3E"));
    }

    #[test]
    fn same_seed_gives_same_colours() {
        let a = PlaceholderGenerator::seeded(42);
        let b = PlaceholderGenerator::seeded(42);
        for _ in 0..5 {
            assert_eq!(a.generate("x", 10, 10), b.generate("x", 10, 10));
        }
    }

    #[test]
    fn fill_colour_is_six_hex_digits() {
        let gen = PlaceholderGenerator::seeded(1);
        let uri = gen.generate("x", 10, 10);
        let start = uri.find("fill='%23").unwrap() + "fill='%23".len();
        let color = &uri[start..start + 6];
        assert!(color.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(uri.as_bytes()[start + 6], b'\'');
    }

    #[test]
    fn label_markup_and_fragment_chars_are_escaped() {
        assert_eq!(encode_label("A & B <1> #2 50%"), "A &amp; B &lt;1&gt; %232 50%25");
    }

    #[test]
    fn project_placeholders_are_numbered_from_one() {
        let gen = PlaceholderGenerator::seeded(3);
        let all = gen.project_placeholders(3);
        assert_eq!(all.len(), 3);
        assert!(all[0].contains("%3EProject 1%3C"));
        assert!(all[2].contains("%3EProject 3%3C"));
        assert!(all[1].contains("width='800' height='600'"));
        assert!(gen.project_placeholders(0).is_empty());
    }
}
