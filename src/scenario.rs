//! Training scenarios: player stats plus spawn patterns of targets.
//!
//! Leaf fields fill in the target, spawn pattern or scenario currently being built.
//! Because handlers run when an element closes, a `<target>` is complete by the time
//! its own handler runs, which moves it into the current spawn pattern. The same
//! goes for `<spawn_pattern>` into the scenario and `<scenario>` into the set.

use std::mem;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::LoadError;
use crate::fields::{self, FieldError};
use crate::loader::{self, Setter};
use crate::tokens::View;
use crate::Options;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vec3 { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetShape {
    #[default]
    Cube,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    pub shape: TargetShape,
    pub health: f32,
    /// Between 0 and 1.
    pub spawn_chance: f32,
    pub dimensions: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnPattern {
    pub targets: Vec<Target>,
    pub target_count: usize,
    pub spawn_min: Vec3,
    pub spawn_max: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub firerate: f32,
    pub damage: f32,
    pub spawn_patterns: Vec<SpawnPattern>,
}

/// Scenarios by name, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioSet {
    scenarios: IndexMap<String, Scenario>,
}

#[derive(Default)]
struct Builder {
    scenarios: IndexMap<String, Scenario>,
    scenario: Scenario,
    pattern: SpawnPattern,
    target: Target,
}

const TAGS: &[(&str, Setter<Builder>)] = &[
    ("scenario", push_scenario),
    ("spawn_pattern", push_spawn_pattern),
    ("target", push_target),
    ("name", set_name),
    ("firerate", set_firerate),
    ("damage", set_damage),
    ("type", set_target_type),
    ("health", set_target_health),
    ("spawnChance", set_target_spawn_chance),
    ("dimensions", set_target_dimensions),
    ("targetCount", set_spawn_pattern_target_count),
    ("area", set_spawn_pattern_area),
];

impl ScenarioSet {
    pub fn from_bytes(buffer: &[u8]) -> Result<ScenarioSet, LoadError> {
        ScenarioSet::from_bytes_with(buffer, &Options::default())
    }

    pub fn from_bytes_with(buffer: &[u8], options: &Options) -> Result<ScenarioSet, LoadError> {
        let builder = loader::run(buffer, options, Builder::default(), TAGS)?;
        Ok(ScenarioSet {
            scenarios: builder.scenarios,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<ScenarioSet, LoadError> {
        ScenarioSet::from_bytes(&loader::read(path.as_ref())?)
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn push_target(builder: &mut Builder, _: View<'_>) -> Result<(), FieldError> {
    let target = mem::take(&mut builder.target);
    builder.pattern.targets.push(target);
    Ok(())
}

fn push_spawn_pattern(builder: &mut Builder, _: View<'_>) -> Result<(), FieldError> {
    let pattern = mem::take(&mut builder.pattern);
    builder.scenario.spawn_patterns.push(pattern);
    Ok(())
}

fn push_scenario(builder: &mut Builder, _: View<'_>) -> Result<(), FieldError> {
    let mut scenario = mem::take(&mut builder.scenario);
    if scenario.name.is_empty() {
        scenario.name = format!("scenario {}", builder.scenarios.len() + 1);
    }
    if builder.scenarios.contains_key(&scenario.name) {
        return Err(FieldError::DuplicateScenario(scenario.name));
    }
    builder.scenarios.insert(scenario.name.clone(), scenario);
    Ok(())
}

fn set_name(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    builder.scenario.name = fields::text(content)?.to_string();
    Ok(())
}

fn set_firerate(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    builder.scenario.firerate = fields::float(content)?;
    Ok(())
}

fn set_damage(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    builder.scenario.damage = fields::float(content)?;
    Ok(())
}

fn set_target_type(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    builder.target.shape = match fields::text(content)? {
        "Cube" => TargetShape::Cube,
        other => return Err(FieldError::TargetType(other.to_string())),
    };
    Ok(())
}

fn set_target_health(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    builder.target.health = fields::float(content)?;
    Ok(())
}

fn set_target_spawn_chance(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    builder.target.spawn_chance = fields::in_range(fields::float(content)?, 0.0, 1.0)?;
    Ok(())
}

// only cubes have dimensions for now
fn set_target_dimensions(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    builder.target.dimensions = fields::float_list::<3>(content)?.into();
    Ok(())
}

fn set_spawn_pattern_target_count(
    builder: &mut Builder,
    content: View<'_>,
) -> Result<(), FieldError> {
    builder.pattern.target_count = fields::integer(content)?;
    Ok(())
}

fn set_spawn_pattern_area(builder: &mut Builder, content: View<'_>) -> Result<(), FieldError> {
    let [min_x, min_y, min_z, max_x, max_y, max_z] = fields::float_list::<6>(content)?;
    builder.pattern.spawn_min = Vec3::from([min_x, min_y, min_z]);
    builder.pattern.spawn_max = Vec3::from([max_x, max_y, max_z]);
    Ok(())
}
