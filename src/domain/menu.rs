/// Circular doubly-linked menu.
///
/// Items live in an arena; `prev`/`next` are indices into it. The first
/// append links the item to itself, every later append splices in between
/// tail and head, so wraparound needs no bounds checks at any size >= 1.

#[derive(Clone, Debug)]
pub struct MenuItem {
    pub label: String,
    prev: usize,
    next: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
    head: usize,
    tail: usize,
    active: usize,
}

impl Menu {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut menu = Menu::default();
        for label in labels {
            menu.append(label);
        }
        menu
    }

    pub fn append(&mut self, label: impl Into<String>) {
        let idx = self.items.len();
        if self.items.is_empty() {
            self.items.push(MenuItem { label: label.into(), prev: idx, next: idx });
            self.head = idx;
            self.tail = idx;
            self.active = idx;
            return;
        }
        self.items.push(MenuItem { label: label.into(), prev: self.tail, next: self.head });
        self.items[self.tail].next = idx;
        self.items[self.head].prev = idx;
        self.tail = idx;
    }

    pub fn next(&mut self) {
        if let Some(item) = self.items.get(self.active) {
            self.active = item.next;
        }
    }

    pub fn prev(&mut self) {
        if let Some(item) = self.items.get(self.active) {
            self.active = item.prev;
        }
    }

    /// Label under the cursor; `None` only for an empty menu.
    pub fn select(&self) -> Option<&str> {
        self.items.get(self.active).map(|item| item.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Labels in list order from head, each with its active flag.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        let mut cursor = self.head;
        (0..self.items.len()).map(move |_| {
            let idx = cursor;
            cursor = self.items[idx].next;
            (self.items[idx].label.as_str(), idx == self.active)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item {i}")).collect()
    }

    #[test]
    fn next_then_prev_restores_cursor() {
        for size in 1..=6 {
            for steps in 0..20 {
                let mut menu = Menu::new(labels(size));
                menu.next();
                let start = menu.select().map(str::to_string);
                for _ in 0..steps {
                    menu.next();
                }
                for _ in 0..steps {
                    menu.prev();
                }
                assert_eq!(menu.select().map(str::to_string), start, "size {size}, steps {steps}");
            }
        }
    }

    #[test]
    fn wraps_both_ways() {
        let mut menu = Menu::new(["New Game", "Load Game", "Exit"]);
        assert_eq!(menu.select(), Some("New Game"));
        menu.prev();
        assert_eq!(menu.select(), Some("Exit"));
        menu.next();
        menu.next();
        assert_eq!(menu.select(), Some("Load Game"));
    }

    #[test]
    fn single_item_links_to_itself() {
        let mut menu = Menu::new(["Main Menu"]);
        menu.next();
        assert_eq!(menu.select(), Some("Main Menu"));
        menu.prev();
        assert_eq!(menu.select(), Some("Main Menu"));
    }

    #[test]
    fn empty_menu_is_a_no_op() {
        let mut menu = Menu::default();
        menu.next();
        menu.prev();
        assert_eq!(menu.select(), None);
        assert_eq!(menu.entries().count(), 0);
    }

    #[test]
    fn entries_follow_list_order() {
        let mut menu = Menu::new(["a", "b", "c"]);
        menu.next();
        let seen: Vec<_> = menu.entries().collect();
        assert_eq!(seen, vec![("a", false), ("b", true), ("c", false)]);
        assert_eq!(menu.len(), 3);
    }
}
