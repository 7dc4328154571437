//! Rolling price window

use std::collections::VecDeque;

/// Fixed-capacity window over the most recent prices
///
/// Strict FIFO: once full, each push evicts the single oldest entry.
/// Owned exclusively by the ingestion pipeline, so no interior locking.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    prices: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    /// Create a window holding at most `capacity` prices
    pub fn new(capacity: usize) -> Self {
        Self {
            prices: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a price, evicting the oldest entry when full
    pub fn push(&mut self, price: f64) {
        if self.prices.len() == self.capacity {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    /// Iterate over the current contents in arrival order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }

    /// Number of prices currently held
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the window holds no prices yet
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Maximum number of prices the window can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_window_is_empty() {
        let window = RollingWindow::new(100);
        assert!(window.is_empty());
        assert_eq!(window.len(), 0);
        assert_eq!(window.capacity(), 100);
    }

    #[test]
    fn test_push_preserves_arrival_order() {
        let mut window = RollingWindow::new(5);
        window.push(1.0);
        window.push(2.0);
        window.push(3.0);

        let contents: Vec<f64> = window.iter().collect();
        assert_eq!(contents, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut window = RollingWindow::new(3);
        for i in 0..50 {
            window.push(i as f64);
            assert!(window.len() <= 3);
        }
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = RollingWindow::new(3);
        for price in [1.0, 2.0, 3.0, 4.0, 5.0] {
            window.push(price);
        }

        // Only the 3 most recent remain, oldest first
        let contents: Vec<f64> = window.iter().collect();
        assert_eq!(contents, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_accepts_repeated_values() {
        let mut window = RollingWindow::new(4);
        for _ in 0..10 {
            window.push(42.0);
        }

        assert_eq!(window.len(), 4);
        assert!(window.iter().all(|p| p == 42.0));
    }

    #[test]
    fn test_holds_exactly_last_n_pushed() {
        let mut window = RollingWindow::new(100);
        for i in 0..250 {
            window.push(i as f64);
        }

        let contents: Vec<f64> = window.iter().collect();
        let expected: Vec<f64> = (150..250).map(|i| i as f64).collect();
        assert_eq!(contents, expected);
    }
}
