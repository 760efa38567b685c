use bitflags::bitflags;

bitflags! {
    /// Per-draw render state, set with `RenderBackend::set_state` right
    /// before a `submit`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateFlags: u64 {
        const WRITE_R = 1 << 0;
        const WRITE_G = 1 << 1;
        const WRITE_B = 1 << 2;
        const WRITE_A = 1 << 3;
        const WRITE_Z = 1 << 4;

        const DEPTH_TEST_LESS = 1 << 8;

        const CULL_CW = 1 << 12;
        const CULL_CCW = 1 << 13;

        const BLEND_ALPHA = 1 << 16;

        const PT_TRISTRIP = 1 << 20;
        const PT_LINES = 1 << 21;
        const PT_LINESTRIP = 1 << 22;
        const PT_POINTS = 1 << 23;

        const MSAA = 1 << 28;

        const WRITE_RGB = Self::WRITE_R.bits() | Self::WRITE_G.bits() | Self::WRITE_B.bits();

        /// Opaque triangles with depth test/write and clockwise culling.
        const DEFAULT = Self::WRITE_RGB.bits()
            | Self::WRITE_A.bits()
            | Self::WRITE_Z.bits()
            | Self::DEPTH_TEST_LESS.bits()
            | Self::CULL_CW.bits()
            | Self::MSAA.bits();
    }
}

bitflags! {
    /// Flags for `RenderBackend::set_view_clear`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u16 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

bitflags! {
    /// Backbuffer reset flags, passed to `RenderBackend::reset`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResetFlags: u32 {
        const VSYNC = 1 << 0;
        const MSAA_X4 = 1 << 1;
        const MSAA_X16 = 1 << 2;
    }
}

bitflags! {
    /// Sampler flags attached to a texture at creation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SamplerFlags: u32 {
        const U_BORDER = 1 << 0;
        const V_BORDER = 1 << 1;
        const MIN_POINT = 1 << 4;
        const MAG_POINT = 1 << 5;
        const MIN_ANISOTROPIC = 1 << 6;
        const MAG_ANISOTROPIC = 1 << 7;
    }
}
