use logix_core::graphics::{GraphicsApi, GraphicsError, NativeHandle, ShaderStage};
use logix_core::{EngineError, Identifiable, Identifier, Logger, UnmanagedResource};

use crate::assets::{asset_path, verify_extension, AssetLoader, FRAGMENT_SHADER_EXTENSIONS, VERTEX_SHADER_EXTENSIONS};

/// A linked vertex + fragment program.
#[derive(Debug, Clone)]
pub struct Shader {
    id: Identifier,
    program: NativeHandle,
}

impl Shader {
    pub fn load(
        loader: &mut AssetLoader<'_>,
        id: Identifier,
        vertex_filename: &str,
        fragment_filename: &str,
        suppress_extension_warnings: bool,
    ) -> Result<Shader, EngineError> {
        let log = loader.log;
        log.profile(&format!("Loading shader '{id}'"), true, || {
            let vertex_filename = verify_extension(
                log,
                vertex_filename,
                VERTEX_SHADER_EXTENSIONS,
                suppress_extension_warnings,
            )?;
            let fragment_filename = verify_extension(
                log,
                fragment_filename,
                FRAGMENT_SHADER_EXTENSIONS,
                suppress_extension_warnings,
            )?;
            let vertex_source = read_source(loader, &vertex_filename)?;
            let fragment_source = read_source(loader, &fragment_filename)?;

            let program = build_program(log, &mut *loader.gpu, &id, &vertex_source, &fragment_source)?;
            let shader = Shader { id, program };
            loader.resources.track(Box::new(shader.clone()));
            Ok(shader)
        })
    }

    pub fn program(&self) -> NativeHandle {
        self.program
    }
}

fn read_source(loader: &AssetLoader<'_>, filename: &str) -> Result<String, EngineError> {
    let path = asset_path(filename);
    let bytes = loader.assets.read(&path)?;
    String::from_utf8(bytes).map_err(|_| EngineError::AssetLoadFailed {
        path,
        reason: "shader source is not valid UTF-8".to_string(),
    })
}

/// Compile both stages and link them. Every native object created on the
/// way is deleted again if a later step fails.
fn build_program(
    log: &Logger,
    gpu: &mut dyn GraphicsApi,
    id: &Identifier,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<NativeHandle, EngineError> {
    let vertex = compile_stage(log, gpu, id, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile_stage(log, gpu, id, ShaderStage::Fragment, fragment_source) {
        Ok(fragment) => fragment,
        Err(err) => {
            discard(log, "shader", vertex, gpu.delete_shader(vertex));
            return Err(err);
        }
    };

    let program = match gpu.create_program() {
        Ok(program) => program,
        Err(err) => {
            discard(log, "shader", vertex, gpu.delete_shader(vertex));
            discard(log, "shader", fragment, gpu.delete_shader(fragment));
            return Err(err.into());
        }
    };
    let linked = match link(gpu, program, vertex, fragment) {
        Ok(link_log) if link_log.trim().is_empty() => Ok(program),
        Ok(link_log) => Err(EngineError::ShaderLinkFailed {
            id: id.to_string(),
            log: link_log.trim().to_string(),
        }),
        Err(err) => Err(err.into()),
    };

    if linked.is_ok() {
        discard(log, "shader attachment", vertex, gpu.detach_shader(program, vertex));
        discard(log, "shader attachment", fragment, gpu.detach_shader(program, fragment));
    } else {
        discard(log, "program", program, gpu.delete_program(program));
    }
    discard(log, "shader", vertex, gpu.delete_shader(vertex));
    discard(log, "shader", fragment, gpu.delete_shader(fragment));
    linked
}

fn compile_stage(
    log: &Logger,
    gpu: &mut dyn GraphicsApi,
    id: &Identifier,
    stage: ShaderStage,
    source: &str,
) -> Result<NativeHandle, EngineError> {
    let shader = gpu.create_shader(stage)?;
    match gpu.compile_shader(shader, source) {
        Ok(info) if info.trim().is_empty() => Ok(shader),
        Ok(info) => {
            discard(log, "shader", shader, gpu.delete_shader(shader));
            Err(EngineError::ShaderCompilationFailed {
                id: id.to_string(),
                stage,
                log: info.trim().to_string(),
            })
        }
        Err(err) => {
            discard(log, "shader", shader, gpu.delete_shader(shader));
            Err(err.into())
        }
    }
}

fn link(
    gpu: &mut dyn GraphicsApi,
    program: NativeHandle,
    vertex: NativeHandle,
    fragment: NativeHandle,
) -> Result<String, GraphicsError> {
    gpu.attach_shader(program, vertex)?;
    gpu.attach_shader(program, fragment)?;
    gpu.link_program(program)
}

/// Teardown of an intermediate object; failures are only logged so the
/// original error is the one that propagates.
fn discard(log: &Logger, what: &str, handle: NativeHandle, result: Result<(), GraphicsError>) {
    if let Err(err) = result {
        log.warning(format!("Could not delete intermediate {what} {handle}: {err}"));
    }
}

impl Identifiable for Shader {
    const KIND: &'static str = "Shader";

    fn identifier(&self) -> &Identifier {
        &self.id
    }
}

impl UnmanagedResource for Shader {
    fn identifier(&self) -> &Identifier {
        &self.id
    }

    fn native_handle(&self) -> NativeHandle {
        self.program
    }

    fn kind(&self) -> &'static str {
        <Self as Identifiable>::KIND
    }

    fn release(&self, gpu: &mut dyn GraphicsApi) -> Result<(), GraphicsError> {
        gpu.delete_program(self.program)
    }
}
