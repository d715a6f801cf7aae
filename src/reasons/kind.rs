//! The closed set of move reasons and the objects they refer to.

use std::fmt;

/// Why a move might be worth playing.
///
/// The declaration order is the canonical sort key for reason lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReasonKind {
    Attack,
    AttackGoodKo,
    AttackBadKo,
    AttackThreat,
    Defend,
    DefendGoodKo,
    DefendBadKo,
    DefendThreat,
    Connect,
    Cut,
    Antisuji,
    Semeai,
    SemeaiThreat,
    BlockTerritory,
    ExpandTerritory,
    ExpandMoyo,
    VitalEye,
    StrategicAttack,
    StrategicDefend,
    OwlAttack,
    OwlAttackGoodKo,
    OwlAttackBadKo,
    OwlDefend,
    OwlDefendGoodKo,
    OwlDefendBadKo,
    OwlAttackThreat,
    OwlDefenseThreat,
    OwlPreventThreat,
    UncertainOwlAttack,
    UncertainOwlDefense,
    AttackEither,
    DefendBoth,
    MyAtariAtari,
    YourAtariAtari,
}

/// Which object table a reason kind refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectClass {
    Nothing,
    Size,
    Worm,
    Dragon,
    WormPair,
    Connection,
    Eye,
}

impl ReasonKind {
    pub const TACTICAL_ATTACKS: [ReasonKind; 3] = [
        ReasonKind::Attack,
        ReasonKind::AttackGoodKo,
        ReasonKind::AttackBadKo,
    ];
    pub const TACTICAL_DEFENSES: [ReasonKind; 3] = [
        ReasonKind::Defend,
        ReasonKind::DefendGoodKo,
        ReasonKind::DefendBadKo,
    ];
    pub const OWL_ATTACKS: [ReasonKind; 3] = [
        ReasonKind::OwlAttack,
        ReasonKind::OwlAttackGoodKo,
        ReasonKind::OwlAttackBadKo,
    ];
    pub const OWL_DEFENSES: [ReasonKind; 3] = [
        ReasonKind::OwlDefend,
        ReasonKind::OwlDefendGoodKo,
        ReasonKind::OwlDefendBadKo,
    ];

    /// The object table this kind's subject lives in.
    pub fn subject_class(self) -> SubjectClass {
        use ReasonKind::*;
        match self {
            Attack | AttackGoodKo | AttackBadKo | AttackThreat | Defend | DefendGoodKo
            | DefendBadKo | DefendThreat => SubjectClass::Worm,
            Connect | Cut => SubjectClass::Connection,
            Antisuji | BlockTerritory | ExpandTerritory | ExpandMoyo => SubjectClass::Nothing,
            Semeai | SemeaiThreat | StrategicAttack | StrategicDefend | OwlAttack
            | OwlAttackGoodKo | OwlAttackBadKo | OwlDefend | OwlDefendGoodKo | OwlDefendBadKo
            | OwlAttackThreat | OwlDefenseThreat | OwlPreventThreat | UncertainOwlAttack
            | UncertainOwlDefense => SubjectClass::Dragon,
            VitalEye => SubjectClass::Eye,
            AttackEither | DefendBoth => SubjectClass::WormPair,
            MyAtariAtari | YourAtariAtari => SubjectClass::Size,
        }
    }

    pub fn is_tactical_attack(self) -> bool {
        Self::TACTICAL_ATTACKS.contains(&self)
    }

    pub fn is_tactical_defense(self) -> bool {
        Self::TACTICAL_DEFENSES.contains(&self)
    }

    pub fn is_owl_attack(self) -> bool {
        Self::OWL_ATTACKS.contains(&self)
    }

    pub fn is_owl_defense(self) -> bool {
        Self::OWL_DEFENSES.contains(&self)
    }

    /// Share of the full value lost because the result is only a ko.
    pub fn ko_discount(self) -> f32 {
        use ReasonKind::*;
        match self {
            AttackGoodKo | DefendGoodKo | OwlAttackGoodKo | OwlDefendGoodKo => 0.3,
            AttackBadKo | DefendBadKo | OwlAttackBadKo | OwlDefendBadKo => 0.5,
            _ => 0.0,
        }
    }
}

impl fmt::Display for ReasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ReasonKind::*;
        let name = match self {
            Attack => "attack",
            AttackGoodKo => "attack (good ko)",
            AttackBadKo => "attack (bad ko)",
            AttackThreat => "attack threat",
            Defend => "defense",
            DefendGoodKo => "defense (good ko)",
            DefendBadKo => "defense (bad ko)",
            DefendThreat => "defense threat",
            Connect => "connection",
            Cut => "cut",
            Antisuji => "antisuji",
            Semeai => "semeai",
            SemeaiThreat => "semeai threat",
            BlockTerritory => "block territory",
            ExpandTerritory => "expand territory",
            ExpandMoyo => "expand moyo",
            VitalEye => "vital eye",
            StrategicAttack => "strategic attack",
            StrategicDefend => "strategic defense",
            OwlAttack => "owl attack",
            OwlAttackGoodKo => "owl attack (good ko)",
            OwlAttackBadKo => "owl attack (bad ko)",
            OwlDefend => "owl defense",
            OwlDefendGoodKo => "owl defense (good ko)",
            OwlDefendBadKo => "owl defense (bad ko)",
            OwlAttackThreat => "owl attack threat",
            OwlDefenseThreat => "owl defense threat",
            OwlPreventThreat => "owl prevent threat",
            UncertainOwlAttack => "uncertain owl attack",
            UncertainOwlDefense => "uncertain owl defense",
            AttackEither => "attack either",
            DefendBoth => "defend both",
            MyAtariAtari => "atari-atari",
            YourAtariAtari => "atari-atari defense",
        };
        f.write_str(name)
    }
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// Handle into the worm table.
    WormId
);
handle!(
    /// Handle into the dragon table.
    DragonId
);
handle!(
    /// Handle into the unordered worm pair table.
    WormPairId
);
handle!(
    /// Handle into the connection (dragon pair) table.
    ConnectionId
);
handle!(
    /// Handle into the eye space table.
    EyeId
);

/// What a reason refers to. The variant is determined by the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    Nothing,
    Size(u32),
    Worm(WormId),
    Dragon(DragonId),
    WormPair(WormPairId),
    Connection(ConnectionId),
    Eye(EyeId),
}

impl Subject {
    pub fn class(self) -> SubjectClass {
        match self {
            Subject::Nothing => SubjectClass::Nothing,
            Subject::Size(_) => SubjectClass::Size,
            Subject::Worm(_) => SubjectClass::Worm,
            Subject::Dragon(_) => SubjectClass::Dragon,
            Subject::WormPair(_) => SubjectClass::WormPair,
            Subject::Connection(_) => SubjectClass::Connection,
            Subject::Eye(_) => SubjectClass::Eye,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ko_variants_share_subject_class() {
        for kind in ReasonKind::TACTICAL_ATTACKS {
            assert_eq!(kind.subject_class(), SubjectClass::Worm);
        }
        for kind in ReasonKind::OWL_DEFENSES {
            assert_eq!(kind.subject_class(), SubjectClass::Dragon);
        }
    }

    #[test]
    fn ko_discounts() {
        assert_eq!(ReasonKind::Attack.ko_discount(), 0.0);
        assert_eq!(ReasonKind::DefendGoodKo.ko_discount(), 0.3);
        assert_eq!(ReasonKind::OwlAttackBadKo.ko_discount(), 0.5);
    }

    #[test]
    fn subjects_order_within_a_class() {
        assert!(Subject::Worm(WormId(1)) < Subject::Worm(WormId(2)));
        assert_eq!(Subject::Size(4).class(), SubjectClass::Size);
    }
}
