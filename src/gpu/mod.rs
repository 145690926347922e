use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use num_complex::Complex64;
use wgpu::util::DeviceExt;

use crate::fractal::escape::julia_constant;
use crate::fractal::{FractalParams, FractalType};

const WORKGROUP_SIZE: u32 = 16;

/// Chemin de calcul GPU du noyau escape-time.
///
/// Le shader produit les mêmes matrices (itérations, z final) que le
/// chemin CPU ; la colorisation reste côté CPU pour que les deux chemins
/// partagent exactement le même dégradé. Toute méthode retournant `None`
/// signale au moteur appelant de retomber sur le CPU.
pub struct GpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuRenderer {
    /// Tente de créer l'adaptateur, le périphérique et le pipeline.
    /// `None` si aucun backend GPU compatible n'est disponible.
    pub fn new() -> Option<Self> {
        pollster::block_on(async {
            let instance = wgpu::Instance::default();
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await?;

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("escape-time-device"),
                        required_features: wgpu::Features::empty(),
                        required_limits: wgpu::Limits::default(),
                        memory_hints: wgpu::MemoryHints::default(),
                    },
                    None,
                )
                .await
                .ok()?;

            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("escape-time-bind-group-layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: NonZeroU64::new(
                                    std::mem::size_of::<ShaderParams>() as u64,
                                ),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: false },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("escape-time-pipeline-layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("escape-time-shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("escape_time.wgsl").into()),
            });

            let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("escape-time-pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: "main",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

            Some(Self {
                device,
                queue,
                pipeline,
                bind_group_layout,
            })
        })
    }

    /// Calcule les matrices (itérations, z final) d'une image complète.
    ///
    /// La famille doit être escape-time ; les autres retournent `None`
    /// immédiatement. Le temps ne sert qu'à animer la constante de Julia.
    pub fn render(
        &self,
        params: &FractalParams,
        fractal_type: FractalType,
        width: u32,
        height: u32,
        time: f64,
    ) -> Option<(Vec<u32>, Vec<Complex64>)> {
        if !fractal_type.uses_escape_time() {
            return None;
        }
        let w = width as usize;
        let h = height as usize;
        if w == 0 || h == 0 {
            return Some((Vec::new(), Vec::new()));
        }

        let julia_c = julia_constant(params, time);
        let output_count = w * h;
        let output_size = (output_count * std::mem::size_of::<PixelOut>()) as u64;

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("escape-time-output"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let readback_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("escape-time-readback"),
            size: output_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("escape-time-params"),
                contents: bytemuck::bytes_of(&ShaderParams {
                    zoom: params.zoom as f32,
                    pan_x: params.pan_x as f32,
                    pan_y: params.pan_y as f32,
                    power: params.power as f32,
                    c_re: julia_c.re as f32,
                    c_im: julia_c.im as f32,
                    z0_re: params.z_real as f32,
                    z0_im: params.z_imag as f32,
                    escape_radius: params.escape_radius as f32,
                    _pad: [0.0; 3],
                    width,
                    height,
                    max_iterations: params.max_iterations,
                    fractal_kind: fractal_type.id(),
                }),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("escape-time-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("escape-time-encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("escape-time-pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let dispatch_x = (width + WORKGROUP_SIZE - 1) / WORKGROUP_SIZE;
            let dispatch_y = (height + WORKGROUP_SIZE - 1) / WORKGROUP_SIZE;
            pass.dispatch_workgroups(dispatch_x, dispatch_y, 1);
        }

        encoder.copy_buffer_to_buffer(&output_buffer, 0, &readback_buffer, 0, output_size);
        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = readback_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = sender.send(r);
        });
        loop {
            if let Ok(result) = receiver.try_recv() {
                result.ok()?;
                break;
            }
            self.device.poll(wgpu::Maintain::Poll);
            std::thread::sleep(std::time::Duration::from_millis(1));
        }

        let data = buffer_slice.get_mapped_range();
        let pixels: &[PixelOut] = bytemuck::cast_slice(&data);
        let mut iterations = Vec::with_capacity(output_count);
        let mut zs = Vec::with_capacity(output_count);
        for p in pixels {
            iterations.push(p.iter);
            zs.push(Complex64::new(p.z_re as f64, p.z_im as f64));
        }
        drop(data);
        readback_buffer.unmap();

        Some((iterations, zs))
    }
}

/// Bloc uniforme du shader, 64 octets. L'ordre des champs doit suivre
/// la struct Params de escape_time.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ShaderParams {
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
    power: f32,
    c_re: f32,
    c_im: f32,
    z0_re: f32,
    z0_im: f32,
    escape_radius: f32,
    _pad: [f32; 3],
    width: u32,
    height: u32,
    max_iterations: u32,
    fractal_kind: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct PixelOut {
    iter: u32,
    z_re: f32,
    z_im: f32,
    _pad: u32,
}
