pub mod material;
pub mod model;
pub mod transform;

use self::model::{InstancedModel, Model};

/// Everything drawn in one frame.
#[derive(Default)]
pub struct Scene {
    pub models: Vec<Model>,
    pub instances: Vec<InstancedModel>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, model: Model) {
        self.models.push(model);
    }

    pub fn add_instance(&mut self, instance: InstancedModel) {
        self.instances.push(instance);
    }

    pub fn triangle_count(&self) -> usize {
        let owned: usize = self.models.iter().map(|model| model.mesh.triangle_count()).sum();
        let shared: usize = self
            .instances
            .iter()
            .map(|instance| instance.mesh().triangle_count())
            .sum();
        owned + shared
    }
}
