//! Console stand-in for the frame's renderer
//!
//! Tracks which image is on screen and logs what a real display would show.
//! It only reads the list through [`ImageListView`].

use frame_client::{ImageListView, ImageRecord};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Cursor {
    index: usize,
    /// Filename on screen, used to keep the position across page resets
    current: Option<String>,
}

/// Slideshow position over a read-only image list
pub struct Slideshow {
    model: Rc<dyn ImageListView>,
    cursor: RefCell<Cursor>,
}

impl Slideshow {
    /// Create a slideshow and subscribe it to the list's reset notification
    pub fn attach(model: Rc<dyn ImageListView>) -> Rc<Self> {
        let slideshow = Rc::new(Self {
            model: Rc::clone(&model),
            cursor: RefCell::new(Cursor::default()),
        });

        let weak = Rc::downgrade(&slideshow);
        model.on_reset(Box::new(move || {
            if let Some(slideshow) = weak.upgrade() {
                slideshow.reposition();
            }
        }));

        slideshow
    }

    pub fn current(&self) -> Option<ImageRecord> {
        let index = self.cursor.borrow().index;
        self.model.at(index).ok()
    }

    pub fn position(&self) -> usize {
        self.cursor.borrow().index
    }

    /// Move to the next image, wrapping to the first
    pub fn advance(&self) -> Option<ImageRecord> {
        let size = self.model.size();
        if size == 0 {
            return None;
        }
        let next = (self.cursor.borrow().index + 1) % size;
        self.show(next)
    }

    /// After a reset, stay on the same image if it is still there, else start over
    fn reposition(&self) {
        let size = self.model.size();
        let wanted = self.cursor.borrow().current.clone();
        let found = wanted
            .as_deref()
            .and_then(|name| self.model.position_of(name));

        match found {
            Some(index) => {
                log::debug!("Keeping position at image {} of {}", index + 1, size);
                self.show(index);
            }
            None if size > 0 => {
                self.show(0);
            }
            None => {
                let mut cursor = self.cursor.borrow_mut();
                cursor.index = 0;
                cursor.current = None;
                log::info!("No images to show");
            }
        }
    }

    fn show(&self, index: usize) -> Option<ImageRecord> {
        let record = self.model.at(index).ok()?;
        {
            let mut cursor = self.cursor.borrow_mut();
            cursor.index = index;
            cursor.current = Some(record.filename().to_string());
        }
        log::info!(
            "Showing {} ({}/{}) {}x{} {}",
            record.filename(),
            index + 1,
            self.model.size(),
            record.width(),
            record.height(),
            record.url()
        );
        if let Ok(json) = serde_json::to_string(&record) {
            log::debug!("Image metadata: {}", json);
        }
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_client::{ImageCollection, Timestamp};

    fn record(name: &str) -> ImageRecord {
        ImageRecord::new(name, "", "", "image/jpeg", 1, 0, 0, Timestamp::INVALID)
    }

    fn setup(names: &[&str]) -> (Rc<ImageCollection>, Rc<Slideshow>) {
        let collection = Rc::new(ImageCollection::new());
        let slideshow = Slideshow::attach(collection.clone());
        collection.replace_all(names.iter().map(|n| record(n)).collect());
        (collection, slideshow)
    }

    #[test]
    fn test_starts_at_first_image() {
        let (_collection, slideshow) = setup(&["a.jpg", "b.jpg"]);
        assert_eq!(slideshow.position(), 0);
        assert_eq!(slideshow.current().unwrap().filename(), "a.jpg");
    }

    #[test]
    fn test_advance_wraps_around() {
        let (_collection, slideshow) = setup(&["a.jpg", "b.jpg", "c.jpg"]);

        assert_eq!(slideshow.advance().unwrap().filename(), "b.jpg");
        assert_eq!(slideshow.advance().unwrap().filename(), "c.jpg");
        assert_eq!(slideshow.advance().unwrap().filename(), "a.jpg");
        assert_eq!(slideshow.position(), 0);
    }

    #[test]
    fn test_empty_list_has_nothing_to_show() {
        let (_collection, slideshow) = setup(&[]);
        assert!(slideshow.current().is_none());
        assert!(slideshow.advance().is_none());
    }

    #[test]
    fn test_reset_keeps_current_image_when_present() {
        let (collection, slideshow) = setup(&["a.jpg", "b.jpg", "c.jpg"]);
        slideshow.advance();
        assert_eq!(slideshow.current().unwrap().filename(), "b.jpg");

        collection.replace_all(vec![record("x.jpg"), record("y.jpg"), record("b.jpg")]);
        assert_eq!(slideshow.position(), 2);
        assert_eq!(slideshow.current().unwrap().filename(), "b.jpg");
    }

    #[test]
    fn test_reset_without_current_image_starts_over() {
        let (collection, slideshow) = setup(&["a.jpg", "b.jpg"]);
        slideshow.advance();

        collection.replace_all(vec![record("x.jpg"), record("y.jpg")]);
        assert_eq!(slideshow.position(), 0);
        assert_eq!(slideshow.current().unwrap().filename(), "x.jpg");

        collection.clear();
        assert!(slideshow.current().is_none());
    }
}
