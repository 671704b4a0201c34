#![forbid(unsafe_code)]
//! End-to-end scramble scenarios against the in-memory host.
//!
//! Run with: cargo test -p kinetype-fx --test scenarios

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kinetype_core::clock::DeterministicClock;
use kinetype_core::{BoxSize, Document, ElementId, HostEvent, IntersectionEntry, StyleProp};
use kinetype_fx::{
    EffectEvent, EffectsConfig, FrameOutcome, GlyphRng, PageEffects, ScrambleOptions,
    ScrambleSession, Scrambler, Trigger,
};
use kinetype_harness::{MemoryDocument, MemoryViewport};
use kinetype_text::Alphabet;
use pretty_assertions::assert_eq;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn xs() -> Alphabet {
    Alphabet::new("X").unwrap()
}

fn element(doc: &mut MemoryDocument, tag: &str, markup: &str) -> ElementId {
    let el = doc.append(doc.body(), tag);
    doc.set_markup(el, markup);
    el
}

#[test]
fn scenario_a_multiline_reveal() {
    let mut doc = MemoryDocument::new();
    let el = element(&mut doc, "h1", "HELLO<br>WORLD");
    let mut session = ScrambleSession::begin(
        &mut doc,
        el,
        "HELLO\nWORLD",
        ms(100),
        xs(),
        GlyphRng::new(1),
    );

    assert_eq!(session.frame(&mut doc, ms(0)), FrameOutcome::Running { revealed: 0 });
    assert_eq!(doc.inner_markup(el).as_deref(), Some("XXXXX<br>XXXXX"));

    assert_eq!(session.frame(&mut doc, ms(50)), FrameOutcome::Running { revealed: 5 });
    assert_eq!(session.frame_text(), "HELLO\nXXXXX");
    assert_eq!(doc.inner_markup(el).as_deref(), Some("HELLO<br>XXXXX"));

    assert_eq!(session.frame(&mut doc, ms(100)), FrameOutcome::Completed);
    assert_eq!(session.frame_text(), "HELLO\nWORLD");
    assert_eq!(doc.inner_markup(el).as_deref(), Some("HELLO<br>WORLD"));
    assert!(doc.inline_styles(el).is_empty());
}

#[test]
fn scenario_b_hover_cancel_restores() {
    let mut doc = MemoryDocument::new();
    let el = element(&mut doc, "span", "Read <strong>docs</strong>");
    let mut scrambler = Scrambler::new(xs(), 2);
    let completed = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&completed);

    let handle = scrambler.run(
        &mut doc,
        el,
        "Read docs",
        ScrambleOptions::new()
            .duration_ms(350)
            .trigger(Trigger::Hover)
            .on_complete(move |_| *flag.borrow_mut() = true),
    );
    scrambler.on_frame(&mut doc, ms(0));
    scrambler.on_frame(&mut doc, ms(10));
    assert_eq!(doc.text(el), "XXXX XXXX");

    assert!(scrambler.cancel(&mut doc, handle).is_some());
    assert_eq!(doc.inner_markup(el).as_deref(), Some("Read <strong>docs</strong>"));
    assert!(doc.inline_styles(el).is_empty());

    for t in [20, 350, 1000] {
        assert!(scrambler.on_frame(&mut doc, ms(t)).is_empty());
    }
    assert!(!*completed.borrow());
}

#[test]
fn scenario_c_reveal_on_viewport_entry() {
    let mut doc = MemoryDocument::new();
    let heading = element(&mut doc, "h2", "Why kinetype");
    doc.set_attribute(heading, "data-scramble-reveal", "");
    let mut vp = MemoryViewport::new();
    let mut page = PageEffects::new(EffectsConfig::default().with_alphabet("X")).unwrap();
    page.init(&mut doc, &mut vp);

    assert_eq!(doc.style(heading, StyleProp::Opacity), "0");

    let below = vp.report(heading, 0.05).unwrap();
    let events = page.handle_event(&mut doc, &mut vp, &HostEvent::Intersection(below));
    assert!(events.is_empty());
    assert_eq!(doc.style(heading, StyleProp::Opacity), "0");

    let entered = vp.report(heading, 0.15).unwrap();
    let events = page.handle_event(&mut doc, &mut vp, &HostEvent::Intersection(entered));
    assert_eq!(
        events,
        vec![EffectEvent::ScrambleStarted {
            element: heading,
            trigger: Trigger::Reveal
        }]
    );
    assert_eq!(doc.style(heading, StyleProp::Opacity), "1");
    assert!(!vp.is_observed(heading));

    // Browsers may still deliver a queued report; it must not restart.
    let late = IntersectionEntry::from_ratio(heading, 1.0);
    assert!(page
        .handle_event(&mut doc, &mut vp, &HostEvent::Intersection(late))
        .is_empty());
    assert_eq!(page.scrambler().active_count(), 1);

    page.handle_event(&mut doc, &mut vp, &HostEvent::Frame(ms(1_000)));
    assert_eq!(doc.text(heading), "XXX XXXXXXXX");
    let done = page.handle_event(&mut doc, &mut vp, &HostEvent::Frame(ms(1_900)));
    assert_eq!(
        done,
        vec![EffectEvent::ScrambleCompleted {
            element: heading,
            trigger: Trigger::Reveal
        }]
    );
    assert_eq!(doc.inner_markup(heading).as_deref(), Some("Why kinetype"));
    assert_eq!(
        doc.inline_styles(heading),
        vec![("opacity", "1".to_string())]
    );
}

#[test]
fn hover_layout_is_stable_with_wide_glyphs() {
    let mut doc = MemoryDocument::new();
    let el = element(&mut doc, "span", "abcd");
    let before = doc.bounding_size(el).unwrap();
    assert_eq!(before, BoxSize::new(32.0, 16.0));

    // Each katakana glyph is two columns wide; the locked box must hold.
    let mut scrambler = Scrambler::new(Alphabet::new("アイ").unwrap(), 11);
    scrambler.run(
        &mut doc,
        el,
        "abcd",
        ScrambleOptions::new().duration_ms(350).trigger(Trigger::Hover),
    );
    for t in (0..=350).step_by(25) {
        scrambler.on_frame(&mut doc, ms(t));
        assert_eq!(doc.bounding_size(el), Some(before), "frame at {t}ms");
    }
    assert!(!scrambler.wants_frame());
    assert_eq!(doc.bounding_size(el), Some(before));
}

#[test]
fn reveal_layout_is_stable() {
    let mut doc = MemoryDocument::new();
    let el = element(&mut doc, "p", "Ship faster");
    doc.set_attribute(el, "data-scramble-reveal", "");
    let natural = doc.bounding_size(el).unwrap();

    let mut vp = MemoryViewport::new();
    let config = EffectsConfig::default().with_alphabet("アイウ");
    let mut page = PageEffects::new(config).unwrap();
    page.init(&mut doc, &mut vp);
    let entry = vp.report(el, 0.5).unwrap();
    page.handle_event(&mut doc, &mut vp, &HostEvent::Intersection(entry));

    let mut t = 0;
    while page.wants_frame() {
        page.handle_event(&mut doc, &mut vp, &HostEvent::Frame(ms(t)));
        assert_eq!(doc.bounding_size(el), Some(natural), "frame at {t}ms");
        t += 16;
    }
    assert!(t > 900);
}

#[test]
fn page_context_serves_direct_calls() {
    let mut doc = MemoryDocument::new();
    let status = element(&mut doc, "span", "idle");
    let mut vp = MemoryViewport::new();
    let mut page = PageEffects::new(EffectsConfig::default().with_seed(99)).unwrap();
    page.init(&mut doc, &mut vp);

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    page.subscribe(Box::new(move |e: &EffectEvent| sink.borrow_mut().push(*e)));

    let opts = page.options();
    page.scramble(&mut doc, status, "busy", opts);
    let mut clock = DeterministicClock::new();
    while page.wants_frame() {
        page.handle_event(&mut doc, &mut vp, &HostEvent::Frame(clock.now()));
        clock.advance(ms(100));
    }
    assert_eq!(clock.now(), ms(900));
    assert_eq!(
        *log.borrow(),
        vec![
            EffectEvent::ScrambleStarted {
                element: status,
                trigger: Trigger::Direct
            },
            EffectEvent::ScrambleCompleted {
                element: status,
                trigger: Trigger::Direct
            },
        ]
    );
}

#[test]
fn detached_element_mid_reveal_is_reported() {
    let mut doc = MemoryDocument::new();
    let el = element(&mut doc, "h3", "Gone soon");
    doc.set_attribute(el, "data-scramble-reveal", "");
    let mut vp = MemoryViewport::new();
    let mut page = PageEffects::new(EffectsConfig::default()).unwrap();
    page.init(&mut doc, &mut vp);
    let entry = vp.report(el, 1.0).unwrap();
    page.handle_event(&mut doc, &mut vp, &HostEvent::Intersection(entry));
    page.handle_event(&mut doc, &mut vp, &HostEvent::Frame(ms(0)));

    doc.detach(el);
    let events = page.handle_event(&mut doc, &mut vp, &HostEvent::Frame(ms(16)));
    assert_eq!(
        events,
        vec![EffectEvent::ScrambleDetached {
            element: el,
            trigger: Trigger::Reveal
        }]
    );
    assert!(!page.wants_frame());
    assert_eq!(doc.inner_markup(el).as_deref(), Some("Gone soon"));
    assert_eq!(doc.style(el, StyleProp::Width), "");
    assert_eq!(doc.inline_styles(el), vec![("opacity", "1".to_string())]);
}

#[test]
fn indented_hover_label_scrambles_on_one_line() {
    let mut doc = MemoryDocument::new();
    let link = doc.append(doc.body(), "a");
    let label = doc.append(link, "span");
    doc.set_attribute(label, "data-scramble", "");
    doc.set_markup(label, "\n      GitHub\n    ");
    let mut vp = MemoryViewport::new();
    let mut page = PageEffects::new(EffectsConfig::default().with_alphabet("X")).unwrap();
    page.init(&mut doc, &mut vp);

    page.handle_event(&mut doc, &mut vp, &HostEvent::PointerEnter(link));
    page.handle_event(&mut doc, &mut vp, &HostEvent::Frame(ms(0)));
    assert_eq!(doc.attribute(label, "data-original-text").as_deref(), Some("GitHub"));
    assert_eq!(doc.inner_markup(label).as_deref(), Some("XXXXXX"));
}
