/// Which body the character currently uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stance {
    Standing,
    Crouching,
}

impl Stance {
    #[inline]
    pub fn from_standing(is_standing: bool) -> Self {
        if is_standing {
            Self::Standing
        } else {
            Self::Crouching
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Self::Standing => Self::Crouching,
            Self::Crouching => Self::Standing,
        }
    }
}

/// A ghost body and the shape it was built from.
#[derive(Clone, Debug)]
pub(crate) struct GhostBody<B, S> {
    pub body: B,
    pub shape: S,
}

/// Both ghost bodies plus the stance that selects the active one.
///
/// Only the active body has contact response.
#[derive(Clone, Debug)]
pub(crate) struct GhostPair<B, S> {
    standing: GhostBody<B, S>,
    crouching: GhostBody<B, S>,
    stance: Stance,
}

impl<B: Copy + Eq, S> GhostPair<B, S> {
    pub fn new(standing: GhostBody<B, S>, crouching: GhostBody<B, S>) -> Self {
        Self {
            standing,
            crouching,
            stance: Stance::Standing,
        }
    }

    #[inline]
    pub fn stance(&self) -> Stance {
        self.stance
    }

    #[inline]
    pub fn set_stance(&mut self, stance: Stance) {
        self.stance = stance;
    }

    #[inline]
    pub fn get(&self, stance: Stance) -> &GhostBody<B, S> {
        match stance {
            Stance::Standing => &self.standing,
            Stance::Crouching => &self.crouching,
        }
    }

    #[inline]
    pub fn active(&self) -> &GhostBody<B, S> {
        self.get(self.stance)
    }

    #[inline]
    pub fn inactive(&self) -> &GhostBody<B, S> {
        self.get(self.stance.other())
    }

    /// True if `body` is one of the two ghosts.
    #[inline]
    pub fn contains(&self, body: B) -> bool {
        body == self.standing.body || body == self.crouching.body
    }

    /// `[standing, crouching]` body handles.
    #[inline]
    pub fn bodies(&self) -> [B; 2] {
        [self.standing.body, self.crouching.body]
    }
}
