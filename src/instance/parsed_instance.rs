use crate::grid::{GridModel, Position};
use crate::instance::InstanceError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reward given to a trapped person listed without an explicit reward, as is
/// the case in search instances.
pub const DEFAULT_TARGET_REWARD: f64 = 1.;

#[derive(Debug, Clone, Deserialize)]
pub struct CityLayout {
    pub rows: i32,
    pub columns: i32,
    #[serde(default)]
    pub blocked: Vec<Position>,
}

/// A trapped person is either a bare `[row, column]` pair or a
/// `[row, column, reward]` triple.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum TrappedEntry {
    Rewarded(i32, i32, f64),
    Plain(i32, i32),
}

impl TrappedEntry {
    pub fn position(&self) -> Position {
        match *self {
            TrappedEntry::Rewarded(row, col, _) | TrappedEntry::Plain(row, col) => {
                Position::new(row, col)
            }
        }
    }

    pub fn reward(&self) -> f64 {
        match *self {
            TrappedEntry::Rewarded(_, _, reward) => reward,
            TrappedEntry::Plain(..) => DEFAULT_TARGET_REWARD,
        }
    }
}

/// A rescue instance as described on disk. The same format serves both the
/// search missions, which ignore rewards, and the MDP agents.
#[derive(Debug, Clone, Deserialize)]
pub struct Instance {
    pub city: CityLayout,
    pub departure: Position,
    #[serde(default)]
    pub dangers: Vec<Position>,
    #[serde(default)]
    pub fatal_dangers: Vec<(i32, i32, f64)>,
    pub trapped: Vec<TrappedEntry>,
}

impl Instance {
    pub fn from_path(path: &Path) -> Result<Self, InstanceError> {
        let text = fs::read_to_string(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "read instance file");
        Self::from_text(&text)
    }

    /// Parse and validate an instance from its JSON text.
    pub fn from_text(text: &str) -> Result<Self, InstanceError> {
        let instance: Instance = serde_json::from_str(text)?;
        instance.validate()?;
        Ok(instance)
    }

    pub fn validate(&self) -> Result<(), InstanceError> {
        let CityLayout { rows, columns, .. } = self.city;
        if rows <= 0 || columns <= 0 {
            return Err(InstanceError::EmptyCity { rows, columns });
        }

        let check = |kind: &'static str, position: Position| {
            let in_bounds = (0..rows).contains(&position.row) && (0..columns).contains(&position.col);
            if in_bounds {
                Ok(())
            } else {
                Err(InstanceError::OutOfBounds {
                    kind,
                    position,
                    rows,
                    columns,
                })
            }
        };

        check("departure", self.departure)?;
        for &position in &self.city.blocked {
            check("blocked", position)?;
        }
        for &position in &self.dangers {
            check("danger", position)?;
        }
        for &(row, col, _) in &self.fatal_dangers {
            check("fatal danger", Position::new(row, col))?;
        }
        for entry in &self.trapped {
            check("trapped", entry.position())?;
        }

        if self.city.blocked.contains(&self.departure) {
            return Err(InstanceError::BlockedDeparture(self.departure));
        }
        if self.trapped.is_empty() {
            return Err(InstanceError::NoTargets);
        }
        Ok(())
    }

    pub fn departure(&self) -> Position {
        self.departure
    }

    /// Build the immutable city model described by this instance.
    pub fn grid(&self) -> GridModel {
        GridModel::new(self.city.rows, self.city.columns)
            .with_blocked(self.city.blocked.iter().copied())
            .with_hazards(self.dangers.iter().copied())
            .with_fatal_dangers(
                self.fatal_dangers
                    .iter()
                    .map(|&(row, col, reward)| (Position::new(row, col), reward)),
            )
            .with_targets(
                self.trapped
                    .iter()
                    .map(|entry| (entry.position(), entry.reward())),
            )
    }
}
