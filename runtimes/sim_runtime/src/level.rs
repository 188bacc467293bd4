// Demo level: a floor, a climbable wall and a ledge on top of it.
//
//            z = -3.0          z = -6.0
//    floor  |  wall (climbable) |  ledge at y = 3.0
//    y = 0  |___________________|_____________

use cgmath::vec3;
use locomotion::{ActorTags, NavMesh, PhysicsWorld};

pub struct Level {
    pub world: PhysicsWorld,
    pub nav: NavMesh,
}

pub fn build() -> locomotion::Result<Level> {
    let mut world = PhysicsWorld::new();
    world.add_box(
        "floor",
        ActorTags::WALKABLE,
        vec3(0.0, -0.1, 0.0),
        vec3(20.0, 0.1, 20.0),
    );
    world.add_box(
        "climbing wall",
        ActorTags::CLIMBABLE,
        vec3(0.0, 1.5, -3.25),
        vec3(2.0, 1.5, 0.25),
    );
    world.add_box(
        "ledge",
        ActorTags::WALKABLE,
        vec3(0.0, 2.9, -5.0),
        vec3(2.0, 0.1, 1.5),
    );

    let mut nav = NavMesh::new();
    // Floor, minus the strip under the wall and ledge
    nav.add_rect(-20.0, 20.0, -3.0, 20.0, 0.0)?;
    nav.add_rect(-20.0, -2.0, -20.0, -3.0, 0.0)?;
    nav.add_rect(2.0, 20.0, -20.0, -3.0, 0.0)?;
    nav.add_rect(-2.0, 2.0, -20.0, -6.5, 0.0)?;
    // Top of the wall and the ledge behind it
    nav.add_rect(-2.0, 2.0, -6.5, -3.0, 3.0)?;

    Ok(Level { world, nav })
}
