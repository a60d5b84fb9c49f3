use crate::models::ImageRecord;
use crate::signal::ChangeSignal;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Positional lookup outside `[0, size())`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub index: usize,
    pub size: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index {} out of range for collection of {} images",
            self.index, self.size
        )
    }
}

impl std::error::Error for OutOfRange {}

/// Read-only view of an image list, as handed to a presentation layer.
///
/// A reset notification means "everything changed": the renderer drops any
/// cached rows and re-reads from `size()`/`at()`.
pub trait ImageListView {
    fn size(&self) -> usize;

    fn at(&self, index: usize) -> Result<ImageRecord, OutOfRange>;

    fn on_reset(&self, listener: Box<dyn Fn()>);

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Index of the first image called `filename`
    fn position_of(&self, filename: &str) -> Option<usize> {
        (0..self.size()).find(|&i| {
            self.at(i)
                .map(|record| record.filename() == filename)
                .unwrap_or(false)
        })
    }
}

/// Ordered image list in server order, replaced wholesale on every refresh
#[derive(Debug)]
pub struct ImageCollection {
    records: RefCell<Rc<[ImageRecord]>>,
    reset: ChangeSignal,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Rc::from(Vec::new())),
            reset: ChangeSignal::new(),
        }
    }

    /// Swap in `records` and then emit a single reset notification.
    ///
    /// The swap completes before any listener runs, so listeners only ever
    /// observe the new contents.
    pub fn replace_all(&self, records: Vec<ImageRecord>) {
        let fresh: Rc<[ImageRecord]> = records.into();
        drop(self.records.replace(fresh));
        self.reset.emit();
    }

    pub fn clear(&self) {
        self.replace_all(Vec::new());
    }

}

impl Default for ImageCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageListView for ImageCollection {
    fn size(&self) -> usize {
        self.records.borrow().len()
    }

    fn at(&self, index: usize) -> Result<ImageRecord, OutOfRange> {
        let records = self.records.borrow();
        records.get(index).cloned().ok_or(OutOfRange {
            index,
            size: records.len(),
        })
    }

    fn on_reset(&self, listener: Box<dyn Fn()>) {
        self.reset.connect(listener);
    }

    fn position_of(&self, filename: &str) -> Option<usize> {
        self.records
            .borrow()
            .iter()
            .position(|record| record.filename() == filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;
    use std::cell::Cell;

    fn record(name: &str) -> ImageRecord {
        ImageRecord::new(
            name,
            format!("/photos/{}", name),
            format!("http://frame.local/images/{}", name),
            "image/jpeg",
            2048,
            640,
            480,
            Timestamp::INVALID,
        )
    }

    #[test]
    fn test_new_collection_is_empty() {
        let collection = ImageCollection::new();
        assert_eq!(collection.size(), 0);
        assert!(collection.is_empty());
        assert_eq!(
            collection.at(0),
            Err(OutOfRange { index: 0, size: 0 })
        );
    }

    #[test]
    fn test_replace_all_keeps_server_order() {
        let collection = ImageCollection::new();
        collection.replace_all(vec![record("c.jpg"), record("a.jpg"), record("b.jpg")]);

        assert_eq!(collection.size(), 3);
        assert_eq!(collection.at(0).unwrap().filename(), "c.jpg");
        assert_eq!(collection.at(2).unwrap().filename(), "b.jpg");
        assert_eq!(collection.position_of("a.jpg"), Some(1));
        assert_eq!(collection.position_of("missing.jpg"), None);
    }

    #[test]
    fn test_position_of_through_view_matches_collection() {
        let collection = Rc::new(ImageCollection::new());
        collection.replace_all(vec![record("x.jpg"), record("dup.jpg"), record("dup.jpg")]);
        let view: Rc<dyn ImageListView> = collection.clone();

        assert_eq!(view.position_of("dup.jpg"), Some(1));
        assert_eq!(view.position_of("nope.jpg"), None);
    }

    #[test]
    fn test_at_out_of_range() {
        let collection = ImageCollection::new();
        collection.replace_all(vec![record("a.jpg")]);

        let err = collection.at(1).unwrap_err();
        assert_eq!(err, OutOfRange { index: 1, size: 1 });
        assert_eq!(
            err.to_string(),
            "Index 1 out of range for collection of 1 images"
        );
    }

    #[test]
    fn test_replace_all_emits_exactly_one_reset() {
        let collection = ImageCollection::new();
        let resets = Rc::new(Cell::new(0));
        {
            let resets = Rc::clone(&resets);
            collection.on_reset(Box::new(move || resets.set(resets.get() + 1)));
        }

        collection.replace_all((0..50).map(|i| record(&format!("{}.jpg", i))).collect());
        assert_eq!(resets.get(), 1);

        collection.clear();
        assert_eq!(resets.get(), 2);
        assert_eq!(collection.size(), 0);
    }

    #[test]
    fn test_reset_listener_sees_only_new_contents() {
        let collection = Rc::new(ImageCollection::new());
        collection.replace_all(vec![record("old-1.jpg"), record("old-2.jpg")]);

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        {
            let view = Rc::clone(&collection);
            let seen = Rc::clone(&seen);
            collection.on_reset(Box::new(move || {
                let names = (0..view.size())
                    .map(|i| view.at(i).unwrap().filename().to_string())
                    .collect::<Vec<_>>();
                seen.borrow_mut().extend(names);
            }));
        }

        collection.replace_all(vec![
            record("new-1.jpg"),
            record("new-2.jpg"),
            record("new-3.jpg"),
        ]);

        assert_eq!(
            *seen.borrow(),
            vec!["new-1.jpg", "new-2.jpg", "new-3.jpg"]
        );
    }
}
