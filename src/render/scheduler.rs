use std::time::Instant;

/// Source de temps monotone, en secondes.
///
/// Le trait permet d'injecter une horloge pilotée à la main dans les
/// tests, là où l'interface utilise l'horloge système.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Horloge système : secondes écoulées depuis sa création.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Horloge de test avançant uniquement sur demande.
#[cfg(test)]
pub struct ManualClock {
    now: std::cell::Cell<f64>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock {
            now: std::cell::Cell::new(0.0),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Chronomètre d'animation.
///
/// Tant que l'animation est inactive, le temps rendu est absent et le
/// chronomètre oublie son origine : chaque réactivation repart de zéro,
/// comme une boucle d'animation relancée.
pub struct AnimationTicker {
    started_at: Option<f64>,
}

impl AnimationTicker {
    pub fn new() -> AnimationTicker {
        AnimationTicker { started_at: None }
    }

    /// Temps d'animation courant, ou None si l'animation est coupée.
    pub fn tick(&mut self, clock: &impl Clock, animating: bool) -> Option<f64> {
        if !animating {
            self.started_at = None;
            return None;
        }
        let now = clock.now();
        let start = *self.started_at.get_or_insert(now);
        Some(now - start)
    }
}

impl Default for AnimationTicker {
    fn default() -> Self {
        AnimationTicker::new()
    }
}
