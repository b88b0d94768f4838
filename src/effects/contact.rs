//! Contact form: turns the inquiry into a WhatsApp deep link.

use crate::motion::{Engine, Signal, TweenVars};
use crate::surface::Surface;

pub const FORM_ID: &str = "contact-form";
pub const SUBMIT: &str = ".cta-submit";

const DEEP_LINK_BASE: &str = "https://wa.me/";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inquiry {
    pub name: String,
    pub phone: String,
    pub interest: String,
}

impl Inquiry {
    /// Reads the `#name`, `#phone` and `#interest` fields. A missing field
    /// reads as empty.
    pub fn from_form<S: Surface>(surface: &S) -> Self {
        let field = |id: &str| surface.field_value(id).unwrap_or_default();
        Self {
            name: field("name"),
            phone: field("phone"),
            interest: field("interest"),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Olá! Vim pelo site e gostaria de mais informações.\n\n\
             *Nome:* {}\n\
             *WhatsApp:* {}\n\
             *Interesse:* {}\n\n\
             Podem me ajudar? 🪁🌊",
            self.name, self.phone, self.interest
        )
    }

    pub fn deep_link(&self, number: &str) -> String {
        format!(
            "{}{}?text={}",
            DEEP_LINK_BASE,
            number,
            urlencoding::encode(&self.message())
        )
    }
}

/// Quick press-in of the submit button.
fn pulse() -> TweenVars {
    TweenVars::new().scale(0.95).duration(0.1).yoyo().repeat(1)
}

/// Handles a submission of `form`: pulses its submit button and opens the
/// deep link once the pulse finishes, or straight away when there is no
/// button. Returns the link.
pub fn submit<S: Surface>(
    engine: &mut Engine<S::Node>,
    surface: &S,
    form: &S::Node,
    number: &str,
) -> String {
    let url = Inquiry::from_form(surface).deep_link(number);
    match surface.query_within(form, SUBMIT).into_iter().next() {
        Some(button) => {
            let target = engine.target(surface, &button);
            engine.animate(target, pulse().on_complete(Signal::OpenUrl(url.clone())));
        }
        None => surface.open_url(&url),
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Prop;
    use crate::testing::{FakeNode, FakeSurface};

    const NUMBER: &str = "554888045775";

    fn form_page(with_button: bool) -> (FakeSurface, usize, Option<usize>) {
        let mut page = FakeSurface::new();
        let form = page.add(&["#contact-form"], FakeNode::new().id(FORM_ID));
        page.add(&[], FakeNode::new().id("name").value("Ana"));
        page.add(&[], FakeNode::new().id("phone").value("48999999999"));
        page.add(&[], FakeNode::new().id("interest").value("Aula Experimental"));
        let button = with_button.then(|| page.add_child(form, SUBMIT, FakeNode::new()));
        (page, form, button)
    }

    #[test]
    fn message_template() {
        let inquiry = Inquiry {
            name: "Ana".to_string(),
            phone: "48999999999".to_string(),
            interest: "Aula Experimental".to_string(),
        };
        assert_eq!(
            inquiry.message(),
            "Olá! Vim pelo site e gostaria de mais informações.\n\n*Nome:* Ana\n*WhatsApp:* 48999999999\n*Interesse:* Aula Experimental\n\nPodem me ajudar? 🪁🌊"
        );
    }

    #[test]
    fn deep_link_is_percent_encoded() {
        let (page, _, _) = form_page(false);
        let url = Inquiry::from_form(&page).deep_link(NUMBER);
        assert!(url.starts_with("https://wa.me/554888045775?text=Ol%C3%A1"));
        assert!(url.contains("%2ANome%3A%2A%20Ana%0A"));
        assert!(url.contains("48999999999"));
        assert!(url.contains("Aula%20Experimental"));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
    }

    #[test]
    fn opens_once_after_the_pulse() {
        let (page, form, _) = form_page(true);
        let mut engine = Engine::new();
        engine.frame(&page, 0.0);
        let url = submit(&mut engine, &page, &form, NUMBER);
        assert!(page.opened().is_empty());

        let mut t = 0.0;
        while t < 1.0 {
            t += 1.0 / 60.0;
            for signal in engine.frame(&page, t) {
                if let Signal::OpenUrl(link) = signal {
                    page.open_url(&link);
                }
            }
        }
        assert_eq!(page.opened(), vec![url]);
        let button = engine.select_within(&page, &form, SUBMIT)[0];
        assert_eq!(engine.pose(button).unwrap().get(&Prop::Scale), 1.0);
    }

    #[test]
    fn opens_immediately_without_a_button() {
        let (page, form, button) = form_page(false);
        assert!(button.is_none());
        let mut engine = Engine::new();
        let url = submit(&mut engine, &page, &form, NUMBER);
        assert_eq!(page.opened(), vec![url]);
    }

    #[test]
    fn missing_fields_read_empty() {
        let page = FakeSurface::new();
        assert_eq!(Inquiry::from_form(&page), Inquiry::default());
    }
}
