use serde::Deserialize;

use crate::curve::{Curve, Keyframe};
use crate::ids::CurveId;

/// A parsed stored scene: a named set of validated curves.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveDocument {
    pub name: String,
    pub curves: Vec<Curve>,
}

/// Public API: parse stored-curve JSON (see fixtures/curves/*.json) into
/// validated [`Curve`]s.
///
/// Notes:
/// - Key times are absolute frames; each curve's times must be finite and
///   strictly increasing.
/// - Key values are preserved verbatim as opaque JSON; a missing value
///   loads as JSON null.
pub fn parse_stored_curves_json(s: &str) -> Result<CurveDocument, String> {
    let doc: StoredScene = serde_json::from_str(s).map_err(|e| format!("parse error: {e}"))?;

    let mut curves: Vec<Curve> = Vec::with_capacity(doc.curves.len());
    for sc in doc.curves {
        let keys: Vec<Keyframe> = sc
            .keys
            .into_iter()
            .map(|k| Keyframe {
                time: k.time,
                value: k.value,
            })
            .collect();
        let curve = Curve {
            id: None::<CurveId>,
            name: sc.name,
            target: sc.target,
            keys,
        };
        curve.validate()?;
        curves.push(curve);
    }

    Ok(CurveDocument {
        name: doc.name,
        curves,
    })
}

#[derive(Deserialize)]
struct StoredScene {
    #[serde(default)]
    name: String,
    #[serde(default)]
    curves: Vec<StoredCurve>,
}

#[derive(Deserialize)]
struct StoredCurve {
    name: String,
    target: String,
    #[serde(default)]
    keys: Vec<StoredKey>,
}

#[derive(Deserialize)]
struct StoredKey {
    time: f64,
    #[serde(default)]
    value: serde_json::Value,
}
