use crate::item::{ItemKind, MenuItem};

/// Read-only entry showing a live value next to its text.
pub struct ItemValue {
    text: String,
    read: Box<dyn Fn() -> String>,
}

impl ItemValue {
    pub fn new(text: impl Into<String>, read: impl Fn() -> String + 'static) -> Self {
        Self {
            text: text.into(),
            read: Box::new(read),
        }
    }
}

impl MenuItem for ItemValue {
    fn text(&self) -> &str {
        &self.text
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Value
    }

    fn is_polling(&self) -> bool {
        true
    }

    fn value(&self) -> Option<String> {
        Some((self.read)())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::render::testing::RecordingRenderer;

    #[test]
    fn draws_the_latest_value() {
        let level = Rc::new(Cell::new(3));
        let source = Rc::clone(&level);
        let item = ItemValue::new("Level", move || source.get().to_string());
        let mut renderer = RecordingRenderer::new(16, 2);

        item.draw(&mut renderer).unwrap();
        level.set(12);
        item.draw(&mut renderer).unwrap();

        let values: Vec<_> = renderer.drawn.iter().map(|drawn| drawn.value.clone()).collect();
        assert_eq!(values, vec![Some("3".to_string()), Some("12".to_string())]);
        assert!(item.is_polling());
        assert_eq!(item.display_len(), 8);
    }
}
