//! wgpu renderer
//!
//! GPU buffers are created lazily the first time a geometry or material is
//! drawn and cached by id until disposed.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use viewport::{
    BasicMaterial, BoxGeometry, GeometryId, MaterialId, PerspectiveCamera, RenderError, Renderer,
    Scene, WindowSize,
};
use wgpu::util::DeviceExt;

use crate::RenderTarget;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TransformUniform {
    mvp: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MaterialUniform {
    color: [f32; 4],
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

struct GpuMaterial {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One per drawn mesh; rewritten every frame.
struct TransformSlot {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuRenderer<T: RenderTarget> {
    output: T,
    /// `None` once disposed
    surface: Option<wgpu::Surface<'static>>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    transform_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    depth_texture: wgpu::TextureView,
    clear_color: wgpu::Color,
    geometries: HashMap<GeometryId, GpuGeometry>,
    materials: HashMap<MaterialId, GpuMaterial>,
    transforms: Vec<TransformSlot>,
}

impl<T: RenderTarget> GpuRenderer<T> {
    pub async fn new(output: T, size: WindowSize) -> Result<Self, RenderError> {
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: default_backends(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(output.surface_target())
            .map_err(|e| RenderError::Init(format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Init(format!("Failed to find adapter: {}", e)))?;

        log::info!("Adapter acquired: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Viewport Device"),
                required_features: wgpu::Features::empty(),
                // WebGL2 limits so the same build runs on the GL fallback
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| RenderError::Init(format!("Failed to create device: {}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Init("Surface not supported by adapter".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        output.resize(WindowSize::new(width, height));
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Basic Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let transform_layout = uniform_layout(
            &device,
            "Transform Bind Group Layout",
            wgpu::ShaderStages::VERTEX,
        );
        let material_layout = uniform_layout(
            &device,
            "Material Bind Group Layout",
            wgpu::ShaderStages::FRAGMENT,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&transform_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        log::info!("Renderer initialized with {}x{} {:?} surface", width, height, surface_format);

        Ok(Self {
            output,
            surface: Some(surface),
            device,
            queue,
            config,
            render_pipeline,
            transform_layout,
            material_layout,
            depth_texture,
            clear_color: wgpu::Color::BLACK,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            transforms: Vec::new(),
        })
    }

    fn upload_geometry(&mut self, geometry: &BoxGeometry) {
        if self.geometries.contains_key(&geometry.id()) {
            return;
        }

        let vertices: Vec<GpuVertex> = geometry
            .vertices()
            .iter()
            .map(|v| GpuVertex {
                position: v.position,
                normal: v.normal,
            })
            .collect();

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex Buffer {:?}", geometry.id())),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Index Buffer {:?}", geometry.id())),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded geometry {:?} ({} vertices, {} indices)",
            geometry.id(),
            vertices.len(),
            geometry.indices().len()
        );

        self.geometries.insert(
            geometry.id(),
            GpuGeometry {
                vertex_buffer,
                index_buffer,
                num_indices: geometry.indices().len() as u32,
            },
        );
    }

    fn upload_material(&mut self, material: &BasicMaterial) {
        if self.materials.contains_key(&material.id()) {
            return;
        }

        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Material Buffer {:?}", material.id())),
            contents: bytemuck::cast_slice(&[MaterialUniform {
                color: material.color(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.materials.insert(
            material.id(),
            GpuMaterial {
                uniform_buffer,
                bind_group,
            },
        );
    }

    fn ensure_transform_slots(&mut self, count: usize) {
        while self.transforms.len() < count {
            let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Transform Buffer"),
                size: std::mem::size_of::<TransformUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Transform Bind Group"),
                layout: &self.transform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

            self.transforms.push(TransformSlot {
                uniform_buffer,
                bind_group,
            });
        }
    }
}

impl<T: RenderTarget> Renderer for GpuRenderer<T> {
    type Output = T;

    fn output_element(&self) -> &T {
        &self.output
    }

    fn set_size(&mut self, size: WindowSize) {
        let Some(surface) = &self.surface else {
            return;
        };
        if size.is_empty() {
            return;
        }

        self.output.resize(size);
        self.config.width = size.width;
        self.config.height = size.height;
        surface.configure(&self.device, &self.config);
        self.depth_texture = create_depth_texture(&self.device, &self.config);
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        };
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if self.surface.is_none() {
            return Err(RenderError::Disposed);
        }

        for mesh in scene.meshes() {
            self.upload_geometry(&mesh.geometry);
            self.upload_material(&mesh.material);
        }
        self.ensure_transform_slots(scene.len());

        let Some(surface) = &self.surface else {
            return Err(RenderError::Disposed);
        };
        let output = match surface.get_current_texture() {
            Ok(texture) => texture,
            Err(e) => {
                if needs_reconfigure(&e) {
                    // Next frame draws to the fresh swapchain
                    surface.configure(&self.device, &self.config);
                    log::info!("Surface {}, reconfigured", e);
                }
                return Err(RenderError::SurfaceUnavailable(e.to_string()));
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let view_projection = camera.view_projection();

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);

            for (mesh, slot) in scene.meshes().zip(&self.transforms) {
                let (Some(geometry), Some(material)) = (
                    self.geometries.get(&mesh.geometry.id()),
                    self.materials.get(&mesh.material.id()),
                ) else {
                    continue;
                };

                let mvp = view_projection * mesh.model_matrix();
                self.queue.write_buffer(
                    &slot.uniform_buffer,
                    0,
                    bytemuck::cast_slice(&[TransformUniform {
                        mvp: mvp.to_cols_array_2d(),
                    }]),
                );

                render_pass.set_bind_group(0, &slot.bind_group, &[]);
                render_pass.set_bind_group(1, &material.bind_group, &[]);
                render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..geometry.num_indices, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn dispose_geometry(&mut self, geometry: &BoxGeometry) {
        if let Some(gpu) = self.geometries.remove(&geometry.id()) {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
            log::debug!("Disposed geometry {:?}", geometry.id());
        }
    }

    fn dispose_material(&mut self, material: &BasicMaterial) {
        if let Some(gpu) = self.materials.remove(&material.id()) {
            gpu.uniform_buffer.destroy();
            log::debug!("Disposed material {:?}", material.id());
        }
    }

    fn dispose(&mut self) {
        for (_, gpu) in self.geometries.drain() {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
        }
        for (_, gpu) in self.materials.drain() {
            gpu.uniform_buffer.destroy();
        }
        for slot in self.transforms.drain(..) {
            slot.uniform_buffer.destroy();
        }
        self.surface = None;
        log::info!("Renderer disposed");
    }
}

/// Lost and outdated surfaces come back after `configure`; the rest are transient.
fn needs_reconfigure(error: &wgpu::SurfaceError) -> bool {
    matches!(error, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
}

#[cfg(target_arch = "wasm32")]
fn default_backends() -> wgpu::Backends {
    wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL
}

#[cfg(not(target_arch = "wasm32"))]
fn default_backends() -> wgpu::Backends {
    wgpu::Backends::all()
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
