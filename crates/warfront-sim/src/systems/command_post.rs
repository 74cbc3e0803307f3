//! Command-post capture.
//!
//! Only infantry count toward presence. Progress moves only while a single
//! team holds a strict majority inside the radius; a tie or an empty post
//! freezes it. The owner's majority drains an enemy's partial progress.

use std::collections::BTreeMap;

use glam::DVec3;
use hecs::{Entity, World};
use tracing::info;

use warfront_core::components::{CommandPost, Infantry, Team};
use warfront_core::events::{PostCaptured, SimEvents};
use warfront_core::types::Transform;

use crate::store;

/// Team with strictly more units than any other, if one exists.
pub fn majority(counts: &BTreeMap<Team, u32>) -> Option<Team> {
    let mut best: Option<(Team, u32)> = None;
    let mut tied = false;
    for (&team, &count) in counts {
        match best {
            Some((_, top)) if count == top => tied = true,
            Some((_, top)) if count < top => {}
            _ => {
                best = Some((team, count));
                tied = false;
            }
        }
    }
    match best {
        Some((team, count)) if count > 0 && !tied => Some(team),
        _ => None,
    }
}

pub fn run(world: &mut World, events: &mut SimEvents, dt: f64) {
    let units: Vec<(DVec3, Team)> = world
        .query::<(&Transform, &Team, &Infantry)>()
        .iter()
        .filter(|(e, _)| store::is_alive(world, *e))
        .map(|(_, (t, team, _))| (t.position, *team))
        .filter(|(_, team)| !team.is_none())
        .collect();

    let mut captured: Vec<(Entity, Team)> = Vec::new();
    for (entity, (transform, post)) in world.query_mut::<(&Transform, &mut CommandPost)>() {
        let mut counts: BTreeMap<Team, u32> = BTreeMap::new();
        for (position, team) in &units {
            if position.distance(transform.position) <= post.radius {
                *counts.entry(*team).or_default() += 1;
            }
        }

        let Some(leader) = majority(&counts) else {
            continue;
        };
        if leader == post.owner {
            post.progress = (post.progress - post.rate * dt).max(0.0);
            if post.progress <= 0.0 {
                post.contesting = Team::NONE;
            }
            continue;
        }

        if post.contesting != leader {
            post.contesting = leader;
            post.progress = 0.0;
        }
        post.progress += post.rate * dt;
        if post.progress >= 1.0 {
            let previous = post.owner;
            post.owner = leader;
            post.progress = 0.0;
            post.contesting = Team::NONE;
            captured.push((entity, previous));
        }
    }

    for (post, previous_owner) in captured {
        let new_owner = match world.get::<&CommandPost>(post) {
            Ok(p) => p.owner,
            Err(_) => continue,
        };
        if let Ok(mut team) = world.get::<&mut Team>(post) {
            *team = new_owner;
        }
        events.posts_captured.push(PostCaptured {
            post,
            previous_owner,
            new_owner,
        });
        info!(post_id = post.id(), previous = previous_owner.0, owner = new_owner.0, "command post captured");
    }
}
