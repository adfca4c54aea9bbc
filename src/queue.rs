//! Estimation de la longueur de file (approximation fluide d'une file M/M/c
//! à taux variables).
//!
//! Deux variantes de propagation coexistent :
//! - **simple** : bisection à 10 itérations sur la forme close, propagation
//!   découpée en `⌈mu·c⌉` sous-pas ;
//! - **raffinée** : bisection à 20 itérations nettant le débit `mu·c` contre
//!   l'arrivée `lam`, un seul pas par heure.
//!
//! La racine retournée par la bisection est approchée : une cible hors
//! d'atteinte renvoie silencieusement le dernier point milieu.

use serde::{Deserialize, Serialize};

const SIMPLE_ITERATIONS: usize = 10;
const REFINED_ITERATIONS: usize = 20;

/// Forme close utilisée pour la longueur attendue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthModel {
    /// Erlang C : attente + travail en service.
    ErlangC,
    /// Erlang C avec le facteur de correction `1 − 1/(16·rho·c)` sur l'attente.
    #[default]
    Corrected,
}

/// Variante de propagation d'une heure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Estimator {
    /// `sub_steps = None` : `⌈mu·c⌉` sous-pas.
    Simple { sub_steps: Option<u32> },
    Refined { model: LengthModel },
}

impl Default for Estimator {
    fn default() -> Self {
        Self::Refined {
            model: LengthModel::default(),
        }
    }
}

impl Estimator {
    pub fn simple() -> Self {
        Self::Simple { sub_steps: None }
    }

    pub fn refined() -> Self {
        Self::default()
    }

    /// Propage `length` sur une heure avec `servers` serveurs.
    pub fn step(&self, mu: f64, lam: f64, servers: u32, length: f64) -> f64 {
        match *self {
            Self::Simple { sub_steps } => step_length(mu, lam, servers, length, sub_steps),
            Self::Refined { model } => step_length_refined(model, mu, lam, servers, length),
        }
    }
}

/// Somme de Poisson `Σ_{n<c} a^n/n!` et dernier terme `a^c/c!`, calculés
/// par récurrence pour éviter le débordement des factorielles.
fn poisson_terms(a: f64, c: u32) -> (f64, f64) {
    let mut sum = 0.0;
    let mut term = 1.0;
    for n in 0..c {
        sum += term;
        term *= a / f64::from(n + 1);
    }
    (sum, term)
}

/// Longueur attendue (file + service) pour `c` serveurs à l'utilisation `rho`.
///
/// Non définie en `rho ∈ {0, 1}` : l'appelant reste dans l'intervalle ouvert.
pub fn length_at_utilization(rho: f64, c: u32) -> f64 {
    let a = f64::from(c) * rho;
    let (sum, last) = poisson_terms(a, c);
    // sum / last vaut +inf quand a^c/c! sous-déborde : l'attente tombe à 0.
    let waiting = rho / (1.0 - rho) / (1.0 + (1.0 - rho) * (sum / last));
    waiting + a
}

/// Variante avec correction de population finie sur la part d'attente.
pub fn corrected_length_at_utilization(rho: f64, c: u32) -> f64 {
    let a = f64::from(c) * rho;
    let (sum, last) = poisson_terms(a, c);
    let one_minus = 1.0 - rho;
    let waiting = last * a / (one_minus * one_minus) / (sum + last / one_minus);
    waiting * (1.0 - 1.0 / (16.0 * a)) + a
}

impl LengthModel {
    pub fn length(&self, rho: f64, c: u32) -> f64 {
        match self {
            Self::ErlangC => length_at_utilization(rho, c),
            Self::Corrected => corrected_length_at_utilization(rho, c),
        }
    }
}

fn bisect(iterations: usize, target: f64, f: impl Fn(f64) -> f64) -> f64 {
    let (mut low, mut high) = (0.0_f64, 1.0_f64);
    for _ in 0..iterations {
        let mid = (low + high) / 2.0;
        let value = f(mid);
        if value == target {
            break;
        }
        if value < target {
            low = mid;
        } else {
            high = mid;
        }
    }
    (low + high) / 2.0
}

/// Utilisation telle que `length_at_utilization(rho, c) ≈ target` (10 itérations).
pub fn find_utilization(c: u32, target: f64) -> f64 {
    bisect(SIMPLE_ITERATIONS, target, |rho| length_at_utilization(rho, c))
}

/// Utilisation telle que `L(rho) + mu·rho·c − lam ≈ target` (20 itérations).
pub fn find_net_utilization(model: LengthModel, mu: f64, lam: f64, c: u32, target: f64) -> f64 {
    bisect(REFINED_ITERATIONS, target, |rho| {
        model.length(rho, c) + mu * rho * f64::from(c) - lam
    })
}

/// Propagation simple : `n_points` sous-pas, chacun re-résolvant `rho`.
pub fn step_length(mu: f64, lam: f64, c: u32, length: f64, n_points: Option<u32>) -> f64 {
    if c == 0 {
        return length + lam;
    }
    let throughput = mu * f64::from(c);
    let n_points = n_points.unwrap_or_else(|| throughput.ceil() as u32).max(1);
    let sub_mu = throughput / f64::from(n_points);
    let sub_lam = lam / f64::from(n_points);
    let mut current = length;
    for _ in 0..n_points {
        let rho = find_utilization(c, current);
        current = (current + sub_lam - sub_mu * rho).max(0.0);
    }
    current
}

/// Propagation raffinée : un pas, `length' = max(length + lam − mu·rho·c, 0)`.
pub fn step_length_refined(model: LengthModel, mu: f64, lam: f64, c: u32, length: f64) -> f64 {
    if c == 0 {
        return length + lam;
    }
    let rho = find_net_utilization(model, mu, lam, c, length);
    (length + lam - mu * rho * f64::from(c)).max(0.0)
}
