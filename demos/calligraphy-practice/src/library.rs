use stroke_engine::{CharacterDefinition, CharacterSet, Node, ReferenceStroke};

/// Horizontal stroke from x=150 to x=450 at height `y`, left to right.
fn horizontal(y: f32) -> ReferenceStroke {
    ReferenceStroke::new(vec![Node::new(150.0, y), Node::new(300.0, y), Node::new(450.0, y)])
}

fn character(id: u32, name: &str, svg: &str, strokes: Vec<ReferenceStroke>) -> CharacterDefinition {
    CharacterDefinition {
        id,
        name: name.to_string(),
        svg_url: Some(format!("/assets/characters/{svg}.svg")),
        strokes,
    }
}

/// The starter set: 一, 二 and 三.
pub fn builtin() -> CharacterSet {
    let characters = vec![
        character(1, "一", "yi", vec![horizontal(300.0)]),
        character(2, "二", "er", vec![horizontal(250.0), horizontal(350.0)]),
        character(3, "三", "san", vec![horizontal(200.0), horizontal(300.0), horizontal(400.0)]),
    ];
    match CharacterSet::new(characters) {
        Ok(set) => set,
        Err(e) => {
            log::error!("built-in characters rejected: {}", e);
            CharacterSet::default()
        }
    }
}
