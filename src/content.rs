// src/content.rs
// Landing sections in page order, with the short blurbs rendered under each
// heading. Offsets are computed from the same line counts the renderer uses.

use figlet_rs::FIGfont;
use once_cell::sync::Lazy;

use crate::prefs::FontMode;

pub const OWNER: &str = "folio";
pub const TAGLINE: &str = "software engineering student · systems, tooling, terminals";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    About,
    Philosophy,
    Projects,
    Stack,
    Writing,
    Testimonials,
    Contact,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Hero,
        Section::About,
        Section::Philosophy,
        Section::Projects,
        Section::Stack,
        Section::Writing,
        Section::Testimonials,
        Section::Contact,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Philosophy => "philosophy",
            Section::Projects => "projects",
            Section::Stack => "stack",
            Section::Writing => "writing",
            Section::Testimonials => "testimonials",
            Section::Contact => "contact",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Hero => "Home",
            Section::About => "About",
            Section::Philosophy => "Philosophy",
            Section::Projects => "Projects",
            Section::Stack => "Tech Stack",
            Section::Writing => "Writing",
            Section::Testimonials => "Testimonials",
            Section::Contact => "Contact",
        }
    }

    pub fn from_id(id: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.id().eq_ignore_ascii_case(id))
    }

    pub fn index(self) -> usize {
        Section::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn blurb(self) -> &'static [&'static str] {
        match self {
            Section::Hero => &[TAGLINE, "", "Press Ctrl+K for commands, Shift+S for settings."],
            Section::About => &[
                "Third-year CS student who likes small, sharp tools.",
                "Spends spare cycles on compilers, terminals and storage engines.",
            ],
            Section::Philosophy => &[
                "Make it work, make it obvious, then make it fast.",
                "Prefer boring technology and loud failures.",
                "Delete more code than you write.",
            ],
            Section::Projects => &[
                "kvlite        log-structured key/value store with compaction",
                "tinylex       table-driven lexer generator",
                "termpaint     cell-diffing terminal renderer",
            ],
            Section::Stack => &[
                "Rust · C · TypeScript · Python",
                "tokio · ratatui · PostgreSQL · SQLite",
                "Linux · Nix · Git",
            ],
            Section::Writing => &[
                "Notes on write-ahead logs",
                "What a terminal actually does with your bytes",
            ],
            Section::Testimonials => &[
                "\"Asks the second question nobody else asks.\"  - lab TA",
                "\"Left the codebase smaller than they found it.\"  - internship mentor",
            ],
            Section::Contact => &["mail: hello@folio.dev", "code: github.com/folio"],
        }
    }
}

static BANNER: Lazy<Vec<String>> = Lazy::new(|| {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(OWNER).map(|figure| figure.to_string()))
        .map(|text| text.lines().map(str::to_string).collect())
        .unwrap_or_else(|| vec![OWNER.to_uppercase()])
});

/// Heading lines for the hero. Mono mode draws the figlet banner, sans mode
/// a single spaced-out title.
pub fn hero_heading(font: FontMode) -> Vec<String> {
    match font {
        FontMode::Mono => BANNER.clone(),
        FontMode::Sans => {
            let spaced: Vec<String> = OWNER.to_uppercase().chars().map(String::from).collect();
            vec![spaced.join(" ")]
        }
    }
}

/// Lines a section occupies: heading, blurb and one blank separator line.
pub fn section_height(section: Section, font: FontMode) -> u16 {
    let heading = match section {
        Section::Hero => hero_heading(font).len(),
        _ => 2,
    };
    (heading + section.blurb().len() + 1) as u16
}

/// First line of every section within the scrolled page.
pub fn section_offsets(font: FontMode) -> Vec<(Section, u16)> {
    let mut offset = 0;
    Section::ALL
        .into_iter()
        .map(|section| {
            let start = offset;
            offset += section_height(section, font);
            (section, start)
        })
        .collect()
}

pub fn page_height(font: FontMode) -> u16 {
    Section::ALL.into_iter().map(|s| section_height(s, font)).sum()
}

/// The section whose region contains `scroll`.
pub fn section_at(scroll: u16, font: FontMode) -> Section {
    section_offsets(font)
        .into_iter()
        .take_while(|(_, start)| *start <= scroll)
        .last()
        .map(|(section, _)| section)
        .unwrap_or(Section::Hero)
}
