use std::f64::consts::FRAC_PI_4;
use std::rc::Rc;

use gail::prelude::*;

fn cube() -> Mesh {
    let root = env!("CARGO_MANIFEST_DIR");
    obj::parse(format!("{root}/tests/models/cube.obj"), &ObjOptions::default()).unwrap()
}

#[test]
fn instanced_cubes() {
    let cube = Rc::new(cube());
    let view = Mat4::from_look_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, Vec3::UP);
    let projection = Mat4::from_perspective(FRAC_PI_4, 16.0 / 9.0, Mat4::DEFAULT_NEAR, Mat4::INFINITE_FAR);

    let mut scene = Scene::new();
    for x in 0..3 {
        let transform = Transform::from_translation(Vec3::new(x as f64 * 2.0, 0.0, 0.0));
        let texture = Rc::new(Texture::new(2, 2));
        let material = BasicMaterial::from_transform(Color::WHITE, Some(texture), &transform, view, projection);
        scene.add_instance(InstancedModel::new(cube.clone(), Rc::new(material), transform));
    }

    assert_eq!(scene.triangle_count(), 36);
    assert_eq!(Rc::strong_count(&cube), 4);

    for instance in &scene.instances {
        let states = instance.shader_states().unwrap();
        assert_eq!(states.len(), 8);
        assert!(states.iter().all(|state| state.attributes.len() == 1));
    }
}

#[test]
fn owned_model_with_missing_attributes() {
    let mut faces = FaceList::new();
    let a = faces.push_vertex(Vertex::new(Vec3::ZERO));
    let b = faces.push_vertex(Vertex::new(Vec3::new(1.0, 0.0, 0.0)));
    let c = faces.push_vertex(Vertex::new(Vec3::new(0.0, 1.0, 0.0)));
    faces.push_face(Face::new(a, b, c)).unwrap();
    let mesh = Mesh::from_faces(&faces).unwrap();

    let font = Rc::new(Texture::new(8, 8));
    let material = Text2DMaterial::new(Color::BLACK, font, Mat4::IDENTITY, 640.0, 480.0);
    let model = Model::new(mesh, Rc::new(material), Transform::default());

    assert!(matches!(
        model.shader_states(),
        Err(MaterialError::UnsupportedVertex { material: "text_2d", .. })
    ));
    assert_eq!(
        model.vertex_buffer(),
        Err(MeshError::InsufficientAttributes(AttributeFormat::Float2))
    );

    let mut scene = Scene::new();
    scene.add(model);
    assert_eq!(scene.triangle_count(), 1);
}
