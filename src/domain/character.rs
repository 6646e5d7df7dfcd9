/// Party members and enemies as the server describes them.
///
/// Liveness is never stored: a character is dead exactly when `hp <= 0`.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EnemyType {
    #[default]
    None,
    Normal,
    Boss,
}

impl EnemyType {
    /// `"boss"` is the only distinguished tag; any other string is a
    /// regular enemy and a missing tag means the character is not an enemy.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(t) if t.eq_ignore_ascii_case("boss") => EnemyType::Boss,
            Some(_) => EnemyType::Normal,
            None => EnemyType::None,
        }
    }

    pub fn is_boss(self) -> bool {
        self == EnemyType::Boss
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Stats {
    pub hp: i64,
    pub max_hp: i64,
    pub mp: i64,
    pub max_mp: i64,
    pub sp: i64,
    pub max_sp: i64,
    pub attack: i64,
    pub defense: i64,
    pub intelligence: i64,
    pub wisdom: i64,
    pub speed: i64,
    pub luck: i64,
}

impl Stats {
    /// Fraction of `value / max` clamped to `0.0..=1.0`. A zero max reads as empty.
    pub fn ratio(value: i64, max: i64) -> f32 {
        if max <= 0 {
            return 0.0;
        }
        (value as f32 / max as f32).clamp(0.0, 1.0)
    }

    /// Secondary attributes in display order, for the character sheet.
    pub fn attributes(&self) -> [(&'static str, i64); 6] {
        [
            ("Attack", self.attack),
            ("Defense", self.defense),
            ("Intelligence", self.intelligence),
            ("Wisdom", self.wisdom),
            ("Speed", self.speed),
            ("Luck", self.luck),
        ]
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Character {
    pub name: String,
    pub portrait: String,
    pub stats: Stats,
    pub active_turn: bool,
    pub enemy_type: EnemyType,
    pub level: i64,
    pub job_class: String,
    pub description: String,
    pub experience: Option<i64>,
    pub exp_goal: Option<i64>,
}

impl Character {
    pub fn is_dead(&self) -> bool {
        self.stats.hp <= 0
    }

    pub fn is_boss(&self) -> bool {
        self.enemy_type.is_boss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_hp(hp: i64) -> Character {
        Character {
            stats: Stats { hp, max_hp: 10, ..Stats::default() },
            ..Character::default()
        }
    }

    #[test]
    fn dead_is_derived_from_hp() {
        assert!(with_hp(0).is_dead());
        assert!(with_hp(-3).is_dead());
        assert!(!with_hp(1).is_dead());
    }

    #[test]
    fn enemy_tag_parsing() {
        assert_eq!(EnemyType::from_tag(Some("boss")), EnemyType::Boss);
        assert_eq!(EnemyType::from_tag(Some("BOSS")), EnemyType::Boss);
        assert_eq!(EnemyType::from_tag(Some("regular")), EnemyType::Normal);
        assert_eq!(EnemyType::from_tag(None), EnemyType::None);
    }

    #[test]
    fn ratio_clamps() {
        assert_eq!(Stats::ratio(5, 10), 0.5);
        assert_eq!(Stats::ratio(20, 10), 1.0);
        assert_eq!(Stats::ratio(-4, 10), 0.0);
        assert_eq!(Stats::ratio(3, 0), 0.0);
    }
}
