//! One object owning every effect on the page. Event handlers and the frame
//! loop call into it; it never touches the browser except through its
//! [`Surface`].

use log::{debug, info};

use crate::config::MotionConfig;
use crate::effects::cursor::{Cursor, HOVER_TARGETS};
use crate::effects::debounce::Debounce;
use crate::effects::pointer::{self, MAGNETIC, TILT};
use crate::effects::{contact, counter, entrance, nav, progress, sections};
use crate::motion::{Engine, Signal};
use crate::surface::Surface;

/// Elements rendered by the motion layer itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay<N> {
    pub ring: Option<N>,
    pub dot: Option<N>,
    pub progress: Option<N>,
}

impl<N> Default for Overlay<N> {
    fn default() -> Self {
        Self { ring: None, dot: None, progress: None }
    }
}

/// Page elements that need event listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings<N> {
    pub hover: Vec<N>,
    pub magnetic: Vec<N>,
    pub tilt: Vec<N>,
    pub anchors: Vec<N>,
    pub menu_links: Vec<N>,
    pub nav_toggle: Option<N>,
    pub form: Option<N>,
}

pub struct Controller<S: Surface> {
    surface: S,
    config: MotionConfig,
    engine: Engine<S::Node>,
    cursor: Option<Cursor<S::Node>>,
    tilt_enabled: bool,
    resize: Debounce,
    loaded: bool,
}

impl<S: Surface> Controller<S> {
    /// Registers every scroll-driven effect. The entrance waits for
    /// [`loaded`](Self::loaded).
    pub fn new(surface: S, config: MotionConfig, overlay: Overlay<S::Node>) -> Self {
        let mut engine = Engine::new();
        if surface.prefers_reduced_motion() {
            info!(
                "Reduced motion preferred, running animations at {}x",
                config.reduced_motion_time_scale
            );
            engine.set_time_scale(config.reduced_motion_time_scale);
        }

        let (width, _) = surface.viewport();
        let desktop = config.is_desktop(width);
        let cursor = match (desktop, overlay.ring.clone(), overlay.dot.clone()) {
            (true, Some(ring), Some(dot)) => Some(Cursor::new(
                &mut engine,
                &surface,
                ring,
                dot,
                config.cursor_smoothing,
            )),
            _ => {
                for node in overlay.ring.iter().chain(overlay.dot.iter()) {
                    surface.set_style(node, "display", "none");
                }
                None
            }
        };

        nav::register(&mut engine, &surface, config.nav_scrolled_offset);
        sections::register(&mut engine, &surface);
        let counters = counter::register(&mut engine, &surface);
        if let Some(bar) = &overlay.progress {
            progress::register(&mut engine, &surface, bar);
        }
        debug!(
            "Registered {} scroll triggers, {} counters, desktop: {}",
            engine.trigger_ranges().len(),
            counters,
            desktop
        );

        let resize = Debounce::new(f64::from(config.resize_debounce_ms) / 1000.0);
        Self {
            surface,
            config,
            engine,
            cursor,
            tilt_enabled: desktop,
            resize,
            loaded: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn engine(&self) -> &Engine<S::Node> {
        &self.engine
    }

    pub fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn bindings(&self) -> Bindings<S::Node> {
        let surface = &self.surface;
        Bindings {
            hover: if self.cursor.is_some() {
                surface.query_all(HOVER_TARGETS)
            } else {
                Vec::new()
            },
            magnetic: surface.query_all(MAGNETIC),
            tilt: if self.tilt_enabled {
                surface.query_all(TILT)
            } else {
                Vec::new()
            },
            anchors: surface.query_all(nav::ANCHORS),
            menu_links: surface.query_all(nav::MENU_LINKS),
            nav_toggle: surface.by_id(nav::TOGGLE_ID),
            form: surface.by_id(contact::FORM_ID),
        }
    }

    /// The window `load` event: images and fonts are in, so every scroll
    /// trigger is measured again.
    pub fn page_loaded(&mut self) {
        self.engine.refresh(&self.surface);
    }

    /// Dismisses the preloader and plays the hero entrance. Only the first
    /// call has any effect.
    pub fn loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        entrance::start(&mut self.engine, &self.surface);
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if let Some(cursor) = &mut self.cursor {
            cursor.pointer_moved(&mut self.engine, x, y);
        }
    }

    pub fn hover(&mut self, active: bool) {
        if let Some(cursor) = &self.cursor {
            cursor.hover(&self.surface, active);
        }
    }

    pub fn magnetic_move(&mut self, node: &S::Node, x: f64, y: f64) {
        let target = self.engine.target(&self.surface, node);
        let rect = self.surface.rect(node);
        pointer::magnetic_pull(
            &mut self.engine,
            target,
            rect,
            (x, y),
            self.config.magnetic_strength,
        );
    }

    pub fn magnetic_leave(&mut self, node: &S::Node) {
        let target = self.engine.target(&self.surface, node);
        pointer::magnetic_release(&mut self.engine, target);
    }

    pub fn tilt_move(&mut self, node: &S::Node, x: f64, y: f64) {
        if !self.tilt_enabled {
            return;
        }
        let target = self.engine.target(&self.surface, node);
        let rect = self.surface.rect(node);
        pointer::tilt(
            &mut self.engine,
            target,
            rect,
            (x, y),
            self.config.tilt_divisor,
            self.config.tilt_perspective,
        );
    }

    pub fn tilt_leave(&mut self, node: &S::Node) {
        if !self.tilt_enabled {
            return;
        }
        let target = self.engine.target(&self.surface, node);
        pointer::tilt_release(&mut self.engine, target);
    }

    pub fn toggle_menu(&mut self) {
        nav::toggle_menu(&self.surface);
    }

    pub fn close_menu(&mut self) {
        nav::close_menu(&self.surface);
    }

    pub fn anchor_clicked(&mut self, href: &str) -> bool {
        nav::scroll_to_anchor(&mut self.engine, &self.surface, href, self.config.anchor_offset)
    }

    /// Returns the deep link, or `None` when the page has no contact form.
    pub fn submit_contact(&mut self) -> Option<String> {
        let form = self.surface.by_id(contact::FORM_ID)?;
        let url = contact::submit(
            &mut self.engine,
            &self.surface,
            &form,
            &self.config.whatsapp_number,
        );
        Some(url)
    }

    pub fn resized(&mut self, now: f64) {
        self.resize.bump(now);
    }

    /// One animation frame at `now` seconds.
    pub fn frame(&mut self, now: f64) {
        if self.resize.poll(now) {
            self.engine.refresh(&self.surface);
        }
        if let Some(cursor) = &mut self.cursor {
            cursor.step(&mut self.engine);
        }
        for signal in self.engine.frame(&self.surface, now) {
            match signal {
                Signal::OpenUrl(url) => {
                    info!("Opening {}", url);
                    self.surface.open_url(&url);
                }
                Signal::CountUp { target, to } => {
                    self.engine.animate(target, counter::count_up(to));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Prop;
    use crate::testing::{FakeNode, FakeSurface};

    fn run(controller: &mut Controller<FakeSurface>, from: f64, seconds: f64) -> f64 {
        let mut t = from;
        while t < from + seconds {
            controller.frame(t);
            t += 1.0 / 60.0;
        }
        controller.frame(from + seconds);
        from + seconds
    }

    fn overlay(page: &mut FakeSurface) -> Overlay<usize> {
        Overlay {
            ring: Some(page.add(&[".cursor"], FakeNode::new())),
            dot: Some(page.add(&[".cursor-dot"], FakeNode::new())),
            progress: Some(page.add(&[".scroll-progress"], FakeNode::new())),
        }
    }

    #[test]
    fn contact_opens_exactly_one_deep_link() {
        let mut page = FakeSurface::new();
        let form = page.add(&[], FakeNode::new().id("contact-form"));
        page.add_child(form, ".cta-submit", FakeNode::new());
        page.add(&[], FakeNode::new().id("name").value("Ana"));
        page.add(&[], FakeNode::new().id("phone").value("48999999999"));
        page.add(&[], FakeNode::new().id("interest").value("Aula Experimental"));
        let overlay = overlay(&mut page);
        let mut controller = Controller::new(page, MotionConfig::default(), overlay);
        assert_eq!(controller.bindings().form, Some(form));

        let url = controller.submit_contact();
        run(&mut controller, 0.0, 1.0);

        let opened = controller.surface().opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(Some(&opened[0]), url.as_ref());
        assert!(opened[0].starts_with("https://wa.me/554888045775?text="));
        assert!(opened[0].contains("Ana"));
        assert!(opened[0].contains("48999999999"));
        assert!(opened[0].contains("Aula%20Experimental"));
    }

    #[test]
    fn resize_burst_refreshes_once() {
        let mut page = FakeSurface::new();
        let section = page.add(&[".experience-stats"], FakeNode::new().at(0.0, 2000.0, 1280.0, 200.0));
        let mut controller = Controller::new(page, MotionConfig::default(), Overlay::default());
        let before = controller.engine().trigger_ranges();

        controller.frame(0.0);
        controller.surface().move_node(section, 2500.0);
        controller.resized(0.0);
        controller.resized(0.1);
        controller.resized(0.2);
        controller.frame(0.3);
        assert_eq!(controller.engine().trigger_ranges(), before);

        controller.frame(0.46);
        let after = controller.engine().trigger_ranges();
        assert_eq!(after[0].0, before[0].0 + 500.0);

        // no further resize, so a later layout change goes unnoticed
        controller.surface().move_node(section, 3000.0);
        run(&mut controller, 0.5, 1.0);
        assert_eq!(controller.engine().trigger_ranges(), after);
    }

    #[test]
    fn window_load_remeasures_before_the_entrance() {
        let mut page = FakeSurface::new();
        let section = page.add(&[".experience-stats"], FakeNode::new().at(0.0, 2000.0, 1280.0, 200.0));
        let mut controller = Controller::new(page, MotionConfig::default(), Overlay::default());
        let before = controller.engine().trigger_ranges();
        assert_eq!(before, vec![(1360.0, 2040.0)]);

        // late images push the section down
        controller.surface().move_node(section, 2600.0);
        controller.page_loaded();
        assert_eq!(controller.engine().trigger_ranges(), vec![(1960.0, 2640.0)]);
        assert!(!controller.loaded);
    }

    #[test]
    fn counter_ends_on_exact_value() {
        let mut page = FakeSurface::new();
        let stat = page.add(
            &[".stat-number"],
            FakeNode::new().at(0.0, 1500.0, 100.0, 60.0).text("0").attr("data-count", "120"),
        );
        let mut controller = Controller::new(page, MotionConfig::default(), Overlay::default());
        let t = run(&mut controller, 0.0, 0.5);
        assert_eq!(controller.surface().text_of(stat), "0");

        controller.surface().set_scroll(1200.0);
        run(&mut controller, t, 4.0);
        assert_eq!(controller.surface().text_of(stat), "120");
    }

    #[test]
    fn magnetic_button_returns_to_origin() {
        let mut page = FakeSurface::new();
        let button = page.add(&[".hero-cta"], FakeNode::new().at(100.0, 100.0, 200.0, 60.0));
        let mut controller = Controller::new(page, MotionConfig::default(), Overlay::default());
        assert_eq!(controller.bindings().magnetic, vec![button]);

        controller.magnetic_move(&button, 280.0, 150.0);
        let t = run(&mut controller, 0.0, 0.5);
        assert_ne!(
            controller.surface().style(button, "transform").as_deref(),
            Some("translate3d(0px, 0px, 0px)")
        );
        controller.magnetic_leave(&button);
        run(&mut controller, t, 1.0);
        assert_eq!(
            controller.surface().style(button, "transform").as_deref(),
            Some("translate3d(0px, 0px, 0px)")
        );
    }

    fn hero_page(reduced_motion: bool) -> (FakeSurface, usize) {
        let mut page = FakeSurface::new();
        page.reduced_motion = reduced_motion;
        page.add(&[".loader"], FakeNode::new());
        let scroll_hint = page.add(&[".hero-scroll"], FakeNode::new().hidden());
        (page, scroll_hint)
    }

    #[test]
    fn reduced_motion_runs_three_times_faster() {
        let (page, hint) = hero_page(true);
        let mut controller = Controller::new(page, MotionConfig::default(), Overlay::default());
        assert_eq!(controller.engine().time_scale(), 3.0);
        controller.loaded();
        // the hero sequence lasts 2.3s at normal speed
        run(&mut controller, 0.0, 0.8);
        assert_eq!(controller.surface().style(hint, "opacity").as_deref(), Some("1"));

        let (page, hint) = hero_page(false);
        let mut controller = Controller::new(page, MotionConfig::default(), Overlay::default());
        assert_eq!(controller.engine().time_scale(), 1.0);
        controller.loaded();
        run(&mut controller, 0.0, 0.8);
        assert_ne!(controller.surface().style(hint, "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn loaded_only_starts_the_entrance_once() {
        let (page, _) = hero_page(false);
        let mut controller = Controller::new(page, MotionConfig::default(), Overlay::default());
        assert_eq!(controller.engine().live_animations(), 0);
        controller.loaded();
        let playing = controller.engine().live_animations();
        controller.loaded();
        assert_eq!(controller.engine().live_animations(), playing);
        assert!(controller.surface().has_class(0, "hidden"));
    }

    #[test]
    fn small_screens_get_no_cursor_or_tilt() {
        let mut page = FakeSurface::new();
        page.viewport = (600.0, 900.0);
        page.add(&[".pricing-card"], FakeNode::new());
        page.add(&["a"], FakeNode::new());
        let overlay = overlay(&mut page);
        let ring = overlay.ring.unwrap_or_default();
        let mut controller = Controller::new(page, MotionConfig::default(), overlay);

        assert!(!controller.has_cursor());
        assert_eq!(controller.surface().style(ring, "display").as_deref(), Some("none"));
        let bindings = controller.bindings();
        assert!(bindings.tilt.is_empty() && bindings.hover.is_empty());
        controller.pointer_moved(10.0, 10.0);
        run(&mut controller, 0.0, 0.2);
        assert_eq!(controller.surface().style(ring, "transform"), None);
    }

    #[test]
    fn desktop_cursor_follows_pointer() {
        let mut page = FakeSurface::new();
        let card = page.add(&[".experience-card"], FakeNode::new().at(0.0, 0.0, 400.0, 400.0));
        let overlay = overlay(&mut page);
        let ring = overlay.ring.unwrap_or_default();
        let mut controller = Controller::new(page, MotionConfig::default(), overlay);

        let bindings = controller.bindings();
        assert_eq!(bindings.hover, vec![card]);
        assert_eq!(bindings.tilt, vec![card]);

        controller.pointer_moved(300.0, 100.0);
        controller.hover(true);
        controller.tilt_move(&card, 300.0, 100.0);
        run(&mut controller, 0.0, 2.0);
        assert!(controller.surface().has_class(ring, "hover"));
        assert_eq!(
            controller.surface().style(ring, "transform").as_deref(),
            Some("translate3d(300px, 100px, 0px)")
        );
        let card_id = controller.engine().find(&card).unwrap();
        let pose = controller.engine().pose(card_id).unwrap();
        assert_eq!(pose.get(&Prop::RotateX), -5.0);
        assert_eq!(pose.get(&Prop::RotateY), -5.0);
    }
}
