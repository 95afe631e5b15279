//! Deployment category profiles
//!
//! Tile and event categories are small integer enumerations whose exact
//! members vary by deployment (some builds ship without Water or Trap).
//! The profile is the single lookup table the rest of the core consults:
//! one spec entry per category id instead of open-ended `match` arms, so
//! adding a category is a data change, not a code change.
//!
//! Profiles can be built in code or loaded from RON.

use serde::{Serialize, Deserialize};

/// Identifier of a tile category within a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCategoryId(pub u8);

/// Identifier of an event-object category within a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCategoryId(pub u8);

/// How a tile category occupies the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorKind {
    /// Occupies a whole cell, anchored at its center.
    #[default]
    Center,
    /// Snaps to a cell edge midpoint (wall-like).
    Edge,
}

/// Declaration of one tile category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub id: TileCategoryId,
    pub name: String,
    #[serde(default)]
    pub anchor: AnchorKind,
    /// Solid tiles (obstacles) forbid event-object attachments.
    #[serde(default)]
    pub solid: bool,
}

/// Declaration of one event-object category with its co-occupancy rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSpec {
    pub id: EventCategoryId,
    pub name: String,
    /// Categories whose presence on a cell blocks placement of this one.
    #[serde(default)]
    pub blocks: Vec<EventCategoryId>,
    /// Categories whose presence shrinks this one's footprint instead.
    #[serde(default)]
    pub shrinks: Vec<EventCategoryId>,
}

/// Outcome of a co-occupancy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Allowed,
    Blocked,
}

/// Error raised when a profile fails to load or validate.
#[derive(Debug)]
pub enum ProfileError {
    Parse(ron::error::SpannedError),
    Validation(String),
}

impl From<ron::error::SpannedError> for ProfileError {
    fn from(e: ron::error::SpannedError) -> Self {
        ProfileError::Parse(e)
    }
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Parse(e) => write!(f, "profile parse error: {}", e),
            ProfileError::Validation(e) => write!(f, "profile validation error: {}", e),
        }
    }
}

impl std::error::Error for ProfileError {}

/// The category tables for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    tiles: Vec<TileSpec>,
    events: Vec<EventSpec>,
}

impl Profile {
    /// Build a profile from explicit tables, rejecting duplicate ids and
    /// dangling constraint references.
    pub fn new(
        name: impl Into<String>,
        tiles: Vec<TileSpec>,
        events: Vec<EventSpec>,
    ) -> Result<Self, ProfileError> {
        let profile = Self {
            name: name.into(),
            tiles,
            events,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// The full deployment: Floor/Wall/Water tiles, Enemy/Item/Stairs/Trap
    /// events with the standard co-occupancy tables.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            tiles: vec![
                TileSpec {
                    id: TileCategoryId(0),
                    name: "floor".to_string(),
                    anchor: AnchorKind::Center,
                    solid: false,
                },
                TileSpec {
                    id: TileCategoryId(1),
                    name: "wall".to_string(),
                    anchor: AnchorKind::Edge,
                    solid: true,
                },
                TileSpec {
                    id: TileCategoryId(2),
                    name: "water".to_string(),
                    anchor: AnchorKind::Center,
                    solid: false,
                },
            ],
            events: vec![
                EventSpec {
                    id: EventCategoryId(0),
                    name: "enemy".to_string(),
                    blocks: vec![EventCategoryId(0)],
                    shrinks: vec![EventCategoryId(1), EventCategoryId(2), EventCategoryId(3)],
                },
                EventSpec {
                    id: EventCategoryId(1),
                    name: "item".to_string(),
                    blocks: vec![EventCategoryId(1), EventCategoryId(2)],
                    shrinks: vec![EventCategoryId(0), EventCategoryId(3)],
                },
                EventSpec {
                    id: EventCategoryId(2),
                    name: "stairs".to_string(),
                    blocks: vec![EventCategoryId(2), EventCategoryId(1), EventCategoryId(3)],
                    shrinks: vec![EventCategoryId(0)],
                },
                EventSpec {
                    id: EventCategoryId(3),
                    name: "trap".to_string(),
                    blocks: vec![EventCategoryId(3), EventCategoryId(2)],
                    shrinks: vec![EventCategoryId(0), EventCategoryId(1)],
                },
            ],
        }
    }

    /// The reduced deployment, without Water tiles or Trap events.
    pub fn minimal() -> Self {
        let mut profile = Self::standard();
        profile.name = "minimal".to_string();
        profile.tiles.retain(|t| t.id != TileCategoryId(2));
        profile.events.retain(|e| e.id != EventCategoryId(3));
        let trap = EventCategoryId(3);
        for event in &mut profile.events {
            event.blocks.retain(|id| *id != trap);
            event.shrinks.retain(|id| *id != trap);
        }
        profile
    }

    /// Load a profile from RON text, e.g.:
    ///
    /// ```ron
    /// (
    ///     name: "custom",
    ///     tiles: [(id: 0, name: "floor"), (id: 1, name: "wall", anchor: Edge, solid: true)],
    ///     events: [(id: 0, name: "enemy", blocks: [0], shrinks: [1])],
    /// )
    /// ```
    pub fn from_ron_str(s: &str) -> Result<Self, ProfileError> {
        let profile: Profile = ron::from_str(s)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        for (i, tile) in self.tiles.iter().enumerate() {
            if self.tiles[..i].iter().any(|t| t.id == tile.id) {
                return Err(ProfileError::Validation(format!(
                    "duplicate tile category id {}",
                    tile.id.0
                )));
            }
        }
        for (i, event) in self.events.iter().enumerate() {
            if self.events[..i].iter().any(|e| e.id == event.id) {
                return Err(ProfileError::Validation(format!(
                    "duplicate event category id {}",
                    event.id.0
                )));
            }
            for id in event.blocks.iter().chain(event.shrinks.iter()) {
                if !self.events.iter().any(|e| e.id == *id) {
                    return Err(ProfileError::Validation(format!(
                        "event '{}' references unknown category id {}",
                        event.name, id.0
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn tile(&self, id: TileCategoryId) -> Option<&TileSpec> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn event(&self, id: EventCategoryId) -> Option<&EventSpec> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn tiles(&self) -> &[TileSpec] {
        &self.tiles
    }

    pub fn events(&self) -> &[EventSpec] {
        &self.events
    }

    /// Co-occupancy block check: Blocked iff any existing direct child's
    /// category is in `category`'s blocking set. Evaluated before
    /// [`Profile::needs_shrink`] on every placement attempt.
    pub fn can_place<I>(&self, existing: I, category: EventCategoryId) -> Placement
    where
        I: IntoIterator<Item = EventCategoryId>,
    {
        let Some(spec) = self.event(category) else {
            return Placement::Blocked;
        };
        if existing.into_iter().any(|c| spec.blocks.contains(&c)) {
            Placement::Blocked
        } else {
            Placement::Allowed
        }
    }

    /// Whether a newly placed `category` object takes the reduced footprint.
    pub fn needs_shrink<I>(&self, existing: I, category: EventCategoryId) -> bool
    where
        I: IntoIterator<Item = EventCategoryId>,
    {
        let Some(spec) = self.event(category) else {
            return false;
        };
        existing.into_iter().any(|c| spec.shrinks.contains(&c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENEMY: EventCategoryId = EventCategoryId(0);
    const ITEM: EventCategoryId = EventCategoryId(1);
    const STAIRS: EventCategoryId = EventCategoryId(2);
    const TRAP: EventCategoryId = EventCategoryId(3);

    #[test]
    fn test_standard_blocking_tables() {
        let profile = Profile::standard();

        // A second enemy on the same cell is blocked.
        assert_eq!(profile.can_place([ENEMY], ENEMY), Placement::Blocked);
        // Items cannot join items or stairs.
        assert_eq!(profile.can_place([STAIRS], ITEM), Placement::Blocked);
        assert_eq!(profile.can_place([ITEM], ITEM), Placement::Blocked);
        // Stairs are the most exclusive.
        assert_eq!(profile.can_place([TRAP], STAIRS), Placement::Blocked);
        // Enemy next to an item is fine.
        assert_eq!(profile.can_place([ITEM], ENEMY), Placement::Allowed);
        assert_eq!(profile.can_place([], ENEMY), Placement::Allowed);
    }

    #[test]
    fn test_standard_shrink_tables() {
        let profile = Profile::standard();

        // Item placed next to an enemy is allowed but shrunk.
        assert_eq!(profile.can_place([ENEMY], ITEM), Placement::Allowed);
        assert!(profile.needs_shrink([ENEMY], ITEM));
        // Enemy shrinks next to anything else.
        assert!(profile.needs_shrink([TRAP], ENEMY));
        assert!(!profile.needs_shrink([], ENEMY));
    }

    #[test]
    fn test_unknown_category_is_blocked() {
        let profile = Profile::minimal();
        assert_eq!(profile.can_place([], TRAP), Placement::Blocked);
        assert!(!profile.needs_shrink([], TRAP));
    }

    #[test]
    fn test_minimal_profile_drops_water_and_trap() {
        let profile = Profile::minimal();
        assert!(profile.tile(TileCategoryId(2)).is_none());
        assert!(profile.event(TRAP).is_none());
        // No event may still reference the removed trap category.
        for event in profile.events() {
            assert!(!event.blocks.contains(&TRAP));
            assert!(!event.shrinks.contains(&TRAP));
        }
    }

    #[test]
    fn test_block_checked_before_shrink() {
        // Stairs both blocks and shrinks in some custom tables; blocking
        // must win. Build a profile where one category does both.
        let profile = Profile::new(
            "overlap",
            vec![TileSpec {
                id: TileCategoryId(0),
                name: "floor".to_string(),
                anchor: AnchorKind::Center,
                solid: false,
            }],
            vec![
                EventSpec {
                    id: EventCategoryId(0),
                    name: "a".to_string(),
                    blocks: vec![EventCategoryId(1)],
                    shrinks: vec![EventCategoryId(1)],
                },
                EventSpec {
                    id: EventCategoryId(1),
                    name: "b".to_string(),
                    blocks: vec![],
                    shrinks: vec![],
                },
            ],
        )
        .unwrap();

        assert_eq!(
            profile.can_place([EventCategoryId(1)], EventCategoryId(0)),
            Placement::Blocked
        );
    }

    #[test]
    fn test_ron_round_trip() {
        let ron_text = r#"(
            name: "custom",
            tiles: [
                (id: 0, name: "floor"),
                (id: 1, name: "wall", anchor: Edge, solid: true),
            ],
            events: [
                (id: 0, name: "enemy", blocks: [0], shrinks: [1]),
                (id: 1, name: "item"),
            ],
        )"#;

        let profile = Profile::from_ron_str(ron_text).unwrap();
        assert_eq!(profile.name, "custom");
        assert_eq!(profile.tile(TileCategoryId(1)).unwrap().anchor, AnchorKind::Edge);
        assert!(profile.tile(TileCategoryId(1)).unwrap().solid);
        assert_eq!(profile.can_place([ENEMY], ENEMY), Placement::Blocked);
        assert!(profile.needs_shrink([ITEM], ENEMY));
    }

    #[test]
    fn test_validation_rejects_duplicates_and_dangling_refs() {
        let dup = Profile::new(
            "dup",
            vec![
                TileSpec {
                    id: TileCategoryId(0),
                    name: "floor".to_string(),
                    anchor: AnchorKind::Center,
                    solid: false,
                },
                TileSpec {
                    id: TileCategoryId(0),
                    name: "again".to_string(),
                    anchor: AnchorKind::Center,
                    solid: false,
                },
            ],
            vec![],
        );
        assert!(matches!(dup, Err(ProfileError::Validation(_))));

        let dangling = Profile::new(
            "dangling",
            vec![],
            vec![EventSpec {
                id: EventCategoryId(0),
                name: "enemy".to_string(),
                blocks: vec![EventCategoryId(9)],
                shrinks: vec![],
            }],
        );
        assert!(matches!(dangling, Err(ProfileError::Validation(_))));
    }
}
