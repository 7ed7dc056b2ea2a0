//! Shopping cart store.
//!
//! Holds the ordered collection of [`CartLine`] entries for the current
//! session and provides mutation operations with well-defined merge
//! semantics. The cart itself is a plain single-threaded value; the
//! facade in [`crate::souk`] wraps it in a `Mutex` for interior
//! mutability.

use crate::models::{Amount, CartLine, LineId};

/// Outcome of [`Cart::add`], so callers can word the confirmation
/// notice accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was inserted with quantity 1.
    Inserted,
    /// An existing line with the same ID had its quantity incremented.
    Merged,
}

/// The active shopping cart.
///
/// Invariants:
/// - lines are unique by [`LineId`]; adding an entity already present
///   increments its quantity instead of duplicating the row,
/// - every line has `quantity >= 1`; decrements clamp at 1 and never
///   remove the line automatically,
/// - totals are recomputed on every call, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    /// Lines in insertion order.
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Adds a candidate line to the cart.
    ///
    /// If a line with the same ID exists its quantity is incremented by
    /// 1 (the candidate's other fields are ignored); otherwise the
    /// candidate is inserted as-is with its quantity forced to 1.
    /// Always succeeds.
    #[inline]
    pub fn add(&mut self, candidate: CartLine) -> AddOutcome {
        if let Some(existing) = self.lines.iter_mut().find(|line| line.id == candidate.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            AddOutcome::Merged
        } else {
            let mut line = candidate;
            line.quantity = 1;
            self.lines.push(line);
            AddOutcome::Inserted
        }
    }

    /// Removes the line with the given ID; no-op if absent.
    #[inline]
    pub fn remove(&mut self, id: &LineId) {
        self.lines.retain(|line| line.id != *id);
    }

    /// Removes every line whose ID is listed; absent IDs are ignored.
    ///
    /// Used after confirmed server-side order acceptance to drop the
    /// submitted snapshot while keeping any line added in the
    /// meantime.
    #[inline]
    pub fn remove_many(&mut self, ids: &[LineId]) {
        self.lines.retain(|line| !ids.contains(&line.id));
    }

    /// Sets a line's quantity to `max(1, quantity)`.
    ///
    /// Zero or negative requests clamp to 1 instead of being rejected.
    /// No-op if the ID is not present.
    #[inline]
    pub fn set_quantity(&mut self, id: &LineId, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == *id) {
            line.quantity = quantity.max(1);
        }
    }

    /// Returns the grand total, recomputed fresh on every call.
    #[inline]
    #[must_use]
    pub fn total_amount(&self) -> Amount {
        self.lines
            .iter()
            .fold(Amount::ZERO, |acc, line| acc.saturating_add(line.line_total()))
    }

    /// Returns the total number of units across all lines.
    #[inline]
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines
            .iter()
            .fold(0_u64, |acc, line| acc.saturating_add(u64::from(line.quantity)))
    }

    /// Returns the lines in insertion order.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns `true` when the cart holds no lines.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empties the cart.
    #[inline]
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    /// Builds a candidate line with the given id and price.
    fn line(id: &str, unit_price: u64) -> CartLine {
        CartLine {
            id: LineId::from(id),
            name: format!("item {id}"),
            unit_price: Amount::new(unit_price),
            image_url: String::new(),
            quantity: 1,
            category: Category::Shopping,
            store: None,
        }
    }

    #[test]
    fn repeated_adds_merge_by_id() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(line("p1", 1_000)), AddOutcome::Inserted);
        assert_eq!(cart.add(line("p1", 1_000)), AddOutcome::Merged);
        assert_eq!(cart.add(line("p1", 1_000)), AddOutcome::Merged);
        assert_eq!(cart.add(line("p2", 500)), AddOutcome::Inserted);

        assert_eq!(cart.lines().len(), 2);
        let first = cart.lines().first().unwrap();
        assert_eq!(first.id, LineId::from("p1"));
        assert_eq!(first.quantity, 3);
    }

    #[test]
    fn add_forces_quantity_to_one() {
        let mut cart = Cart::new();
        let mut candidate = line("p1", 100);
        candidate.quantity = 9;
        let _outcome = cart.add(candidate);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);
    }

    #[test]
    fn set_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        let _outcome = cart.add(line("p1", 100));
        let id = LineId::from("p1");

        cart.set_quantity(&id, 0);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);

        cart.set_quantity(&id, 5);
        assert_eq!(cart.lines().first().unwrap().quantity, 5);
    }

    #[test]
    fn set_quantity_on_missing_id_is_noop() {
        let mut cart = Cart::new();
        let _outcome = cart.add(line("p1", 100));
        cart.set_quantity(&LineId::from("nope"), 7);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut cart = Cart::new();
        let _outcome = cart.add(line("p1", 100));
        cart.remove(&LineId::from("nope"));
        assert_eq!(cart.lines().len(), 1);
        cart.remove(&LineId::from("p1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_match_worked_example() {
        // [{p1, 1000 x2}, {p2, 500 x1}] -> total 2500, count 3.
        let mut cart = Cart::new();
        let _a = cart.add(line("p1", 1_000));
        let _b = cart.add(line("p1", 1_000));
        let _c = cart.add(line("p2", 500));
        assert_eq!(cart.total_amount(), Amount::new(2_500));
        assert_eq!(cart.total_item_count(), 3);
    }

    #[test]
    fn totals_are_recomputed_after_mutation() {
        let mut cart = Cart::new();
        let _outcome = cart.add(line("p1", 1_000));
        assert_eq!(cart.total_amount(), Amount::new(1_000));

        cart.set_quantity(&LineId::from("p1"), 3);
        assert_eq!(cart.total_amount(), Amount::new(3_000));

        cart.remove(&LineId::from("p1"));
        assert_eq!(cart.total_amount(), Amount::ZERO);
        assert_eq!(cart.total_item_count(), 0);
    }

    #[test]
    fn remove_many_keeps_unlisted_lines() {
        let mut cart = Cart::new();
        let _a = cart.add(line("p1", 100));
        let _b = cart.add(line("p2", 200));
        let _c = cart.add(line("p3", 300));
        cart.remove_many(&[LineId::from("p1"), LineId::from("p3"), LineId::from("nope")]);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().unwrap().id, LineId::from("p2"));
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        let _a = cart.add(line("p1", 100));
        let _b = cart.add(line("p2", 200));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Amount::ZERO);
    }
}
