use crate::palette::BaseColor;

/// The standard map base colors, ids 0 through 60. Id 0 is the "nothing drawn" sentinel.
pub static BASE_COLORS: [BaseColor; 61] = [
    BaseColor::none(0),
    BaseColor::hue(1, 127, 178, 56),
    BaseColor::hue(2, 247, 233, 163),
    BaseColor::hue(3, 199, 199, 199),
    BaseColor::hue(4, 255, 0, 0),
    BaseColor::hue(5, 160, 160, 255),
    BaseColor::hue(6, 167, 167, 167),
    BaseColor::hue(7, 0, 124, 0),
    BaseColor::hue(8, 255, 255, 255),
    BaseColor::hue(9, 164, 168, 184),
    BaseColor::hue(10, 151, 109, 77),
    BaseColor::hue(11, 112, 112, 112),
    BaseColor::hue(12, 64, 64, 255),
    BaseColor::hue(13, 143, 119, 72),
    BaseColor::hue(14, 255, 252, 245),
    BaseColor::hue(15, 216, 127, 51),
    BaseColor::hue(16, 178, 76, 216),
    BaseColor::hue(17, 102, 153, 216),
    BaseColor::hue(18, 229, 229, 51),
    BaseColor::hue(19, 127, 204, 25),
    BaseColor::hue(20, 242, 127, 165),
    BaseColor::hue(21, 76, 76, 76),
    BaseColor::hue(22, 153, 153, 153),
    BaseColor::hue(23, 76, 127, 153),
    BaseColor::hue(24, 127, 63, 178),
    BaseColor::hue(25, 51, 76, 178),
    BaseColor::hue(26, 102, 76, 51),
    BaseColor::hue(27, 102, 127, 51),
    BaseColor::hue(28, 153, 51, 51),
    BaseColor::hue(29, 25, 25, 25),
    BaseColor::hue(30, 250, 238, 77),
    BaseColor::hue(31, 92, 219, 213),
    BaseColor::hue(32, 74, 128, 255),
    BaseColor::hue(33, 0, 217, 58),
    BaseColor::hue(34, 129, 86, 49),
    BaseColor::hue(35, 112, 2, 0),
    BaseColor::hue(36, 209, 177, 161),
    BaseColor::hue(37, 159, 82, 36),
    BaseColor::hue(38, 149, 87, 108),
    BaseColor::hue(39, 112, 108, 138),
    BaseColor::hue(40, 186, 133, 36),
    BaseColor::hue(41, 103, 117, 53),
    BaseColor::hue(42, 160, 77, 78),
    BaseColor::hue(43, 57, 41, 35),
    BaseColor::hue(44, 135, 107, 98),
    BaseColor::hue(45, 87, 92, 92),
    BaseColor::hue(46, 122, 73, 88),
    BaseColor::hue(47, 76, 62, 92),
    BaseColor::hue(48, 76, 50, 35),
    BaseColor::hue(49, 76, 82, 42),
    BaseColor::hue(50, 142, 60, 46),
    BaseColor::hue(51, 37, 22, 16),
    BaseColor::hue(52, 189, 48, 49),
    BaseColor::hue(53, 148, 63, 97),
    BaseColor::hue(54, 92, 25, 29),
    BaseColor::hue(55, 22, 126, 134),
    BaseColor::hue(56, 58, 142, 140),
    BaseColor::hue(57, 86, 44, 62),
    BaseColor::hue(58, 20, 180, 133),
    BaseColor::hue(59, 100, 100, 100),
    BaseColor::hue(60, 216, 175, 147),
];
