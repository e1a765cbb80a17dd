//! 4D compass
//!
//! Tells the player which canonical axes are visible in the current section
//! and which way each points. Y is always visible since `up` never changes.

use slice4d_math::{Axis, Basis};

/// One arrow of the compass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisIndicator {
    pub axis: Axis,
    /// False for the fixed axis
    pub visible: bool,
    /// Direction in the section frame, `[right, up, forward]`
    pub direction: [i32; 3],
}

/// How an arrow changed between two compass readings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisChange {
    Unchanged,
    /// Became visible
    Shown,
    /// Became the fixed axis
    Hidden,
    /// Still visible, pointing the opposite way
    Flipped,
    /// Still visible, pointing along another section axis
    Turned,
}

/// The four arrows, indexed by [`Axis::index`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compass {
    indicators: [AxisIndicator; 4],
}

impl Compass {
    pub fn from_basis(basis: &Basis) -> Self {
        let hidden = basis.hidden_axis();
        let indicators = Axis::ALL.map(|axis| AxisIndicator {
            axis,
            visible: axis != hidden,
            direction: basis.project_axis(axis),
        });
        Self { indicators }
    }

    #[inline]
    pub fn indicator(&self, axis: Axis) -> &AxisIndicator {
        &self.indicators[axis.index()]
    }

    /// Axes currently on screen
    pub fn visible_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        self.indicators.iter().filter(|i| i.visible).map(|i| i.axis)
    }

    /// Classify the change of every arrow from `self` to `next`
    pub fn diff(&self, next: &Compass) -> [AxisChange; 4] {
        Axis::ALL.map(|axis| {
            let before = self.indicator(axis);
            let after = next.indicator(axis);
            match (before.visible, after.visible) {
                (false, false) => AxisChange::Unchanged,
                (false, true) => AxisChange::Shown,
                (true, false) => AxisChange::Hidden,
                (true, true) if before.direction == after.direction => AxisChange::Unchanged,
                (true, true) if before.direction.map(|c| -c) == after.direction => AxisChange::Flipped,
                (true, true) => AxisChange::Turned,
            }
        })
    }
}

impl std::fmt::Display for Compass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for axis in self.visible_axes() {
            let indicator = self.indicator(axis);
            if !first {
                write!(f, " ")?;
            }
            first = false;
            let [r, u, fw] = indicator.direction;
            let label = if r != 0 {
                if r > 0 { "right" } else { "left" }
            } else if u != 0 {
                if u > 0 { "up" } else { "down" }
            } else if fw > 0 {
                "forward"
            } else {
                "back"
            };
            write!(f, "{}:{}", indicator.axis, label)?;
        }
        Ok(())
    }
}
