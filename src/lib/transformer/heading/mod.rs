use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};

use crate::{
    headings::Heading,
    utils::{Slugger, escape_attr},
};

/// Headings that link to themselves.
const SELF_LINKED: [HeadingLevel; 3] = [HeadingLevel::H2, HeadingLevel::H3, HeadingLevel::H4];

pub struct HeadingAnchors<'a> {
    pub events: Vec<Event<'a>>,
    /// Assigned ids in document order.
    pub anchors: Vec<String>,
    /// Every heading, with or without an id.
    pub headings: Vec<Heading>,
}

/// Give every heading the anchor of its plain text. Headings whose text has
/// no anchor characters keep no id.
pub fn assign_heading_anchors<'a>(events: Vec<Event<'a>>) -> HeadingAnchors<'a> {
    let mut out: Vec<Event<'a>> = Vec::with_capacity(events.len());
    let mut anchors: Vec<String> = Vec::new();
    let mut headings: Vec<Heading> = Vec::new();
    let mut slugger = Slugger::new();

    // (level, index of the start event in `out`, plain text so far)
    let mut in_heading: Option<(HeadingLevel, usize, String)> = None;

    for ev in events {
        match (&mut in_heading, ev) {
            (None, Event::Start(Tag::Heading { level, classes, attrs, .. })) => {
                in_heading = Some((level, out.len(), String::new()));
                out.push(Event::Start(Tag::Heading {
                    level,
                    id: None,
                    classes,
                    attrs,
                }));
            }

            (Some((_, _, title)), Event::Text(t)) => {
                title.push_str(&t);
                out.push(Event::Text(t));
            }

            (Some((_, _, title)), Event::Code(t)) => {
                title.push_str(&t);
                out.push(Event::Code(t));
            }

            (Some((level, start, title)), Event::End(TagEnd::Heading(end))) => {
                let slug = slugger.slug(title);
                if let Some(id) = slug.clone() {
                    if let Event::Start(Tag::Heading { id: slot, .. }) = &mut out[*start] {
                        *slot = Some(CowStr::from(id.clone()));
                    }

                    if SELF_LINKED.contains(level) {
                        let link = format!(
                            r##"<a aria-hidden="true" class="anchor-link" href="#{}">"##,
                            escape_attr(&id)
                        );
                        out.insert(*start + 1, Event::InlineHtml(CowStr::from(link)));
                        out.push(Event::InlineHtml(CowStr::from("</a>")));
                    }

                    anchors.push(id);
                }

                headings.push(Heading {
                    level: *level as u8,
                    slug,
                    text: title.trim().to_string(),
                });

                out.push(Event::End(TagEnd::Heading(end)));
                in_heading = None;
            }

            (_, other) => out.push(other),
        }
    }

    HeadingAnchors {
        events: out,
        anchors,
        headings,
    }
}
