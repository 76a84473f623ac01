// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;

use strata_core::renderer::{ProgramDescriptor, SamplerKind};

const COPY_VERTEX: &str = r#"
attribute vec4 aPosition;
attribute vec4 aTextureCoord;
uniform mat4 uTextureMatrix;
varying vec2 vTextureCoord;

void main() {
    gl_Position = aPosition;
    vTextureCoord = (uTextureMatrix * aTextureCoord).xy;
}
"#;

// Alpha is forced to 1: the camera image is opaque.
const COPY_FRAGMENT: &str = r#"
#extension GL_OES_EGL_image_external : require
precision mediump float;
varying mediump vec2 vTextureCoord;
uniform samplerExternalOES uTexture;

void main() {
    gl_FragColor = vec4(texture2D(uTexture, vTextureCoord).rgb, 1.0);
}
"#;

/// The program copying the external camera image into an RGB target.
pub fn copy_program() -> ProgramDescriptor<'static> {
    ProgramDescriptor {
        label: Some("camera_copy"),
        vertex: Cow::Borrowed(COPY_VERTEX),
        fragment: Cow::Borrowed(COPY_FRAGMENT),
        sampler: SamplerKind::External,
    }
}
